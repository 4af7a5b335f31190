// This module groups the memory layout generators of the header: the float/integer
// overlays used for bit reinterpretation and the vector/matrix struct layouts with
// their component aliases. Both produce plain text fragments that the emission pipeline
// places in its fixed section order.

//! Memory layout of the generated types.

pub mod overlay;
pub mod shapes;
