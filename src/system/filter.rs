use std::collections::HashSet;

/// Allow-list of interface names (`-i eth0,eth1`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceFilter {
    names: HashSet<String>,
}

impl InterfaceFilter {
    /// Build from a comma-separated list. Returns None when nothing usable is listed,
    /// which means "no filter" rather than "match nothing".
    pub fn parse(list: &str) -> Option<Self> {
        Self::from_names(list.split(','))
    }

    pub fn from_names<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: HashSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(Self { names })
        }
    }

    pub fn allows(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Sorted names, for the rc file and the TUI header
    pub fn names(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.names.iter().map(String::as_str).collect();
        v.sort_unstable();
        v
    }
}
