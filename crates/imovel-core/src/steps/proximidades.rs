//! "Proximidades": nearby points of interest.
//!
//! Selection toggling lives in [`super::caracteristicas`].

use super::{FieldKind, FieldSpec};

pub(crate) const SELECTION_KEY: &str = "proximidades";

pub const FIELDS: &[FieldSpec] =
    &[FieldSpec::new(SELECTION_KEY, "proximidades", FieldKind::IdList).batched()];
