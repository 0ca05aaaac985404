use core::mem;

use std::{
    rc::Rc,
    sync::Arc,
};

use crate::ElementError;

/// Operations a [`DynArray`](crate::DynArray) needs from the values it stores.
///
/// Destruction is `Drop` and must not panic.
pub trait Element: Sized {

    /// Produces an independent copy of `self`.
    fn try_clone(&self) -> Result<Self, ElementError>;

    /// Exchanges two live values.
    ///
    /// Used to shift elements in `insert` and `erase`. A failure there leaves the
    /// array valid but in an unspecified order.
    #[inline(always)]
    fn try_exchange(&mut self, other: &mut Self) -> Result<(), ElementError> {
        mem::swap(self, other);
        Ok(())
    }
}

impl_element_via_clone!(
    (), bool, char,
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    f32, f64,
    String,
);

impl<T: ?Sized> Element for &T {

    #[inline(always)]
    fn try_clone(&self) -> Result<Self, ElementError> {
        Ok(*self)
    }
}

impl<T: Element> Element for Box<T> {

    fn try_clone(&self) -> Result<Self, ElementError> {
        Ok(Box::new((**self).try_clone()?))
    }
}

impl<T: Element> Element for Option<T> {

    fn try_clone(&self) -> Result<Self, ElementError> {
        match self {
            Some(value) => Ok(Some(value.try_clone()?)),
            None => Ok(None),
        }
    }
}

impl<T: ?Sized> Element for Rc<T> {

    #[inline(always)]
    fn try_clone(&self) -> Result<Self, ElementError> {
        Ok(Rc::clone(self))
    }
}

impl<T: ?Sized> Element for Arc<T> {

    #[inline(always)]
    fn try_clone(&self) -> Result<Self, ElementError> {
        Ok(Arc::clone(self))
    }
}

macro_rules! impl_element_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Element),+> Element for ($($name,)+) {

            fn try_clone(&self) -> Result<Self, ElementError> {
                Ok(($(self.$idx.try_clone()?,)+))
            }
        }
    };
}

impl_element_tuple!(A 0);
impl_element_tuple!(A 0, B 1);
impl_element_tuple!(A 0, B 1, C 2);
impl_element_tuple!(A 0, B 1, C 2, D 3);
