pub(crate) mod align;
pub(crate) mod mesh;
pub(crate) mod transform;
