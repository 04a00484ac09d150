use std::collections::BTreeMap;

/// Field names matched without regard to ASCII case, keeping the first spelling seen.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveSet {
    map: BTreeMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            map.entry(name.to_ascii_uppercase())
                .or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    /// Returns the original spelling of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&name.to_ascii_uppercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_uppercase())
    }

    /// First candidate present in the set, resolved to its original spelling.
    pub fn find_first<'a, I>(&self, candidates: I) -> Option<&str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates.into_iter().find_map(|candidate| self.get(candidate))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
