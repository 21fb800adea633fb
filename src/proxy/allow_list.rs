/// Place names answered locally with a fixed confirmation.
#[derive(Debug, Clone)]
pub struct KnownLocations {
    names: Vec<String>,
    folded: Vec<String>,
}

impl KnownLocations {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|name| !name.trim().is_empty())
            .collect();
        let folded = names.iter().map(|name| name.to_lowercase()).collect();
        Self { names, folded }
    }

    /// First configured name contained in `text`, ignoring case.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.folded
            .iter()
            .position(|needle| haystack.contains(needle.as_str()))
            .map(|index| self.names[index].as_str())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::defaults::DEFAULT_KNOWN_LOCATIONS;

    #[test]
    fn matches_case_insensitive_substrings() {
        let locations = KnownLocations::new(DEFAULT_KNOWN_LOCATIONS);
        assert_eq!(
            locations.find_in("Park Street is expanding"),
            Some("Park Street")
        );
        assert_eq!(locations.find_in("how big is SALT LAKE now"), Some("Salt Lake"));
        assert_eq!(locations.find_in("newtown"), None);
        assert_eq!(locations.find_in("What about Howrah?"), None);
        assert_eq!(locations.find_in(""), None);
    }

    #[test]
    fn first_configured_name_wins() {
        let locations = KnownLocations::new(["New Town", "Rajarhat"]);
        assert_eq!(
            locations.find_in("Rajarhat and New Town merged"),
            Some("New Town")
        );
    }

    #[test]
    fn blank_names_never_match() {
        let locations = KnownLocations::new(["", "  ", "Alipore"]);
        assert_eq!(locations.names(), &["Alipore".to_string()]);
        assert_eq!(locations.find_in("anything at all"), None);
    }
}
