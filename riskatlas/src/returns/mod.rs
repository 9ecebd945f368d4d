pub mod returnseries;
pub mod returnstatistics;
