/// Implements [`Element`](crate::Element) through `Clone` for types whose copy cannot fail.
///
/// ```
/// #[derive(Clone)]
/// struct Point { x: f32, y: f32 }
///
/// sarja_mem::impl_element_via_clone!(Point);
/// ```
#[macro_export]
macro_rules! impl_element_via_clone {
    ($($t:ty),+ $(,)?) => {
        $(
            impl $crate::Element for $t {

                #[inline(always)]
                fn try_clone(&self) -> ::core::result::Result<Self, $crate::ElementError> {
                    Ok(::core::clone::Clone::clone(self))
                }
            }
        )+
    };
}

#[cfg(feature = "log")]
macro_rules! realloc_trace {
    ($($arg:tt)*) => {
        sarja_log::trace!($($arg)*)
    };
}

#[cfg(not(feature = "log"))]
macro_rules! realloc_trace {
    ($($arg:tt)*) => {
        { let _ = ($($arg)*); }
    };
}
