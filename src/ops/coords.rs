//! Coordinate access on atom tables.
//!
//! Atom tables keep their coordinates in the three Float columns `x`,
//! `y`, `z`. These helpers move coordinates between that columnar form
//! and `nalgebra` matrices so frames can be applied in bulk.

use nalgebra::{MatrixXx3, MatrixXx4};

use crate::model::frame::{self, Frame};
use crate::ops::error::Error;
use crate::table::{Column, Table};

/// Extracts an N×3 coordinate matrix. Null coordinates become NaN.
pub fn atom_coords(atoms: &Table) -> Result<MatrixXx3<f64>, Error> {
    let [x, y, z] = coordinate_columns(atoms)?;
    Ok(MatrixXx3::from_fn(atoms.height(), |row, col| {
        let values = match col {
            0 => x,
            1 => y,
            _ => z,
        };
        values[row].unwrap_or(f64::NAN)
    }))
}

/// Extracts an N×4 homogeneous coordinate matrix.
pub fn atom_coords_homogeneous(atoms: &Table) -> Result<MatrixXx4<f64>, Error> {
    Ok(frame::homogenize(&atom_coords(atoms)?))
}

fn coordinate_columns(atoms: &Table) -> Result<[&[Option<f64>]; 3], Error> {
    let fetch = |name: &'static str| {
        atoms
            .float_column(name)
            .ok_or_else(|| Error::missing_column(name, "coordinate access"))
    };
    Ok([fetch("x")?, fetch("y")?, fetch("z")?])
}

/// Returns a copy of the table with its coordinate columns replaced.
/// NaN entries become nulls, so nulls survive a transform round trip.
pub fn replace_atom_coords(atoms: &Table, coords: &MatrixXx3<f64>) -> Result<Table, Error> {
    if coords.nrows() != atoms.height() {
        return Err(Error::RowCountMismatch {
            expected: atoms.height(),
            found: coords.nrows(),
        });
    }

    let mut result = atoms.clone();
    for (index, name) in ["x", "y", "z"].into_iter().enumerate() {
        let values = (0..coords.nrows())
            .map(|row| {
                let value = coords[(row, index)];
                (!value.is_nan()).then_some(value)
            })
            .collect();
        result.push_column(name, Column::Float(values));
    }
    Ok(result)
}

/// Applies a frame to every atom position.
pub fn transform_atom_coords(atoms: &Table, frame: &Frame) -> Result<Table, Error> {
    let homogeneous = atom_coords_homogeneous(atoms)?;
    let transformed = frame::transform_coords(&homogeneous, frame);
    replace_atom_coords(atoms, &frame::dehomogenize(&transformed))
}

/// Keeps the atoms of one model and drops the `model_id` column.
///
/// Files without model numbers (the column absent or entirely null) are
/// treated as single-model: every row is kept regardless of the
/// requested id.
pub fn select_model(atoms: &Table, model_id: &str) -> Table {
    let Some(models) = atoms.str_column("model_id") else {
        return atoms.clone();
    };

    let mut result = if models.iter().all(Option::is_none) {
        atoms.clone()
    } else {
        let mask: Vec<bool> = models
            .iter()
            .map(|value| value.as_deref() == Some(model_id))
            .collect();
        atoms.filter(&mask)
    };
    result.drop_column("model_id");
    result
}

/// Drops hydrogen and deuterium atoms. Rows with no element stay.
pub fn prune_hydrogen(atoms: &Table) -> Table {
    let Some(elements) = atoms.str_column("element") else {
        return atoms.clone();
    };

    let mask: Vec<bool> = elements
        .iter()
        .map(|element| match element.as_deref() {
            Some(symbol) => {
                !symbol.eq_ignore_ascii_case("H") && !symbol.eq_ignore_ascii_case("D")
            }
            None => true,
        })
        .collect();
    atoms.filter(&mask)
}
