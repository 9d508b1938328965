//! Operations over atom tables: coordinate transforms, assembly
//! expansion, and residue bookkeeping.

mod assembly;
mod coords;
mod error;
mod residues;

pub use assembly::{build_assembly, parse_oper_expression};
pub use coords::{
    atom_coords, atom_coords_homogeneous, prune_hydrogen, replace_atom_coords, select_model,
    transform_atom_coords,
};
pub use error::Error;
pub use residues::{assign_residue_ids, explode_residue_conformations};
