use alloc::sync::Arc;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

// Label → measured width. Survives item-list reloads so identical labels are not re-measured.
#[cfg(feature = "std")]
pub(crate) type WidthCache = HashMap<Arc<str>, f32>;
#[cfg(not(feature = "std"))]
pub(crate) type WidthCache = BTreeMap<Arc<str>, f32>;
