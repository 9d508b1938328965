mod error;

pub mod cif;
mod mmcif;

pub use mmcif::reader::{
    asymmetric_unit, biological_assembly, parse_structure, read_asymmetric_unit,
    read_biological_assembly, read_structure,
};
pub use mmcif::writer::{write_atoms, write_atoms_to_path};

pub use error::Error;
