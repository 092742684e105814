use std::collections::BTreeSet;

use crate::reference::OBJECT_FILE_SUFFIX;

const TYPES_BY_SUFFIX: &[(&str, &[&str])] = &[
    ("clas", &["CLAS"]),
    ("intf", &["INTF"]),
    ("prog", &["PROG"]),
    ("fugr", &["FUGR"]),
    ("tabl", &["TABL"]),
    ("ttyp", &["TTYP"]),
    ("dtel", &["DTEL"]),
    ("doma", &["DOMA"]),
    ("view", &["VIEW"]),
    ("msag", &["MSAG"]),
    ("tran", &["TRAN"]),
];

/// Upper-cased backend type codes a file name implies. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedTypes(BTreeSet<String>);

impl ExpectedTypes {
    fn from_codes(codes: &[&str]) -> Option<Self> {
        let set: BTreeSet<String> = codes.iter().map(|code| code.to_uppercase()).collect();
        if set.is_empty() {
            None
        } else {
            Some(Self(set))
        }
    }

    /// Exact or prefix match, so `CLAS/OC` satisfies `CLAS`.
    pub fn accepts(&self, object_type: &str) -> bool {
        let object_type = object_type.trim().to_uppercase();
        if object_type.is_empty() {
            return false;
        }
        self.0.iter().any(|code| object_type.starts_with(code.as_str()))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

/// Infer the object types implied by a compound suffix such as
/// `zcl_demo.clas.abap`. Returns `None` when there is no usable hint.
pub fn infer_expected_types(base_name: &str) -> Option<ExpectedTypes> {
    let lower = base_name.to_lowercase();
    if !lower.ends_with(OBJECT_FILE_SUFFIX) {
        return None;
    }

    let parts: Vec<&str> = lower.split('.').filter(|part| !part.is_empty()).collect();
    if parts.len() < 3 {
        return None;
    }

    let kind = parts[parts.len() - 2];
    TYPES_BY_SUFFIX
        .iter()
        .find(|(suffix, _)| *suffix == kind)
        .and_then(|(_, codes)| ExpectedTypes::from_codes(codes))
}
