/// Failure reported by an element's own copy or exchange.
///
/// The array never inspects it; it is handed back to the caller as is.
pub type ElementError = sarja_error::Error;

#[derive(Debug)]
pub enum ArrayError {
    /// No block for `new_capacity` elements could be obtained, either because the
    /// allocator refused or because the size is not representable.
    AllocFailed {
        new_capacity: usize,
    },
    Element(ElementError),
}

impl ArrayError {

    #[inline(always)]
    pub fn is_alloc_failure(&self) -> bool {
        matches!(self, Self::AllocFailed { .. })
    }

    #[inline(always)]
    pub fn element_error(&self) -> Option<&ElementError> {
        match self {
            Self::Element(err) => Some(err),
            Self::AllocFailed { .. } => None,
        }
    }
}

impl From<ElementError> for ArrayError {

    fn from(value: ElementError) -> Self {
        Self::Element(value)
    }
}

impl core::fmt::Display for ArrayError {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AllocFailed { new_capacity } => {
                write!(f, "allocation failed with new capacity {}", new_capacity)
            },
            Self::Element(err) => {
                write!(f, "element operation failed: {}", err)
            },
        }
    }
}

impl core::error::Error for ArrayError {

    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::AllocFailed { .. } => None,
            Self::Element(err) => Some(err),
        }
    }
}
