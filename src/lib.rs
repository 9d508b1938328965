//! # Bioasm
//!
//! **Bioasm** turns crystallographic mmCIF files into flat columnar atom tables and expands them into biological assemblies. Parsing is schema-driven and loads everything as strings before casting, so the format's null markers can never corrupt a numeric column; every downstream operation works on the same small table type and reports failures through typed errors rather than silent drops.
//!
//! ## Features
//!
//! - **Columnar atom tables** – A deliberately small `Table` type with nullable string, integer, and float columns covers exactly what structure pipelines need: filter, select, take, and concatenate.
//! - **Frame algebra** – `Frame` wraps a rigid 4×4 homogeneous transform backed by `nalgebra`, with axis-angle construction, exact rigid inversion, and bulk coordinate application.
//! - **Schema-driven extraction** – Declarative column specs map raw mmCIF categories to typed tables, defaulting absent categories to typed empty tables and failing loudly on missing required columns.
//! - **Assembly expansion** – Generation rules and symmetry operators reproduce each biological assembly, with every copy tagged by a zero-based symmetry-mate index.
//! - **Residue bookkeeping** – Composite-key residue ids that never merge symmetry copies, plus alternate-conformation explosion that completes each conformer with its shared atoms.

mod model;
mod table;

pub mod io;
pub mod ops;

pub use model::frame::{dehomogenize, homogenize, transform_coords, Frame};
pub use model::structure::{AssemblyRule, Entity, Structure};
pub use table::{Column, DataType, Table};
