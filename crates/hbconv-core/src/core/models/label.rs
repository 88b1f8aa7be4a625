use std::fmt;

/// Human-readable name of one hydrogen bond, formatted as `"{donor}-{acceptor}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HBondLabel(String);

impl HBondLabel {
    pub fn new(donor_group: &str, acceptor_group: &str) -> Self {
        Self(format!("{}-{}", donor_group, acceptor_group))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for HBondLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HBondLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
