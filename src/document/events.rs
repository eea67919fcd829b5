#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    Empty(RawElement),
    Start(RawElement),
    End(String),
    Comment(String),
    Text(String),
    CData(String),
    Other(super::RawXmlEvent),
}

impl EventKind {
    /// The element carried by a `Start` or `Empty` event.
    pub fn element(&self) -> Option<&RawElement> {
        match self {
            EventKind::Start(el) | EventKind::Empty(el) => Some(el),
            _ => None,
        }
    }

    /// Apply `f` to the element of a `Start` or `Empty` event, keeping the
    /// event kind. Other events are returned unchanged.
    pub fn map_element(self, f: impl FnOnce(RawElement) -> RawElement) -> Self {
        match self {
            EventKind::Start(el) => EventKind::Start(f(el)),
            EventKind::Empty(el) => EventKind::Empty(f(el)),
            other => other,
        }
    }
}

/// Element name and attributes, with attribute order preserved.
///
/// Attribute values are held unescaped; escaping is reapplied on output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement(pub String, pub Vec<(String, String)>);

impl RawElement {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.1
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.get_attr(key).is_some()
    }

    /// Replace the value of `key` in place, or append it if not present.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        if let Some((_, v)) = self.1.iter_mut().find(|(k, _)| k == key) {
            *v = value.to_string();
        } else {
            self.1.push((key.to_string(), value.to_string()));
        }
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let idx = self.1.iter().position(|(k, _)| k == key)?;
        Some(self.1.remove(idx).1)
    }
}

impl std::fmt::Display for RawElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        for (k, v) in &self.1 {
            write!(f, r#" {}="{}""#, k, v)?;
        }
        Ok(())
    }
}

/// A complete XML document as an ordered list of events.
///
/// Lists are not mutated in place; rewriting produces a new list
/// (see `FromIterator`).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventList {
    pub events: Vec<EventKind>,
}

impl FromIterator<EventKind> for EventList {
    fn from_iter<T: IntoIterator<Item = EventKind>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for EventList {
    type Item = EventKind;
    type IntoIter = std::vec::IntoIter<EventKind>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl EventList {
    /// Iterate over all `Start` and `Empty` elements named `name`.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RawElement> {
        self.events
            .iter()
            .filter_map(EventKind::element)
            .filter(move |el| el.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_el() -> RawElement {
        RawElement(
            "path".into(),
            vec![
                ("d".into(), "M0 0L1 1".into()),
                ("fill".into(), "none".into()),
                ("stroke".into(), "red".into()),
            ],
        )
    }

    #[test]
    fn test_raw_element_set_attr() {
        let mut el = path_el();
        el.set_attr("fill", "blue");
        el.set_attr("id", "a");
        assert_eq!(
            el.to_string(),
            r#"path d="M0 0L1 1" fill="blue" stroke="red" id="a""#
        );
    }

    #[test]
    fn test_raw_element_remove_attr() {
        let mut el = path_el();
        assert_eq!(el.remove_attr("stroke"), Some("red".to_string()));
        assert_eq!(el.remove_attr("stroke"), None);
        assert!(!el.has_attr("stroke"));
        assert_eq!(el.get_attr("d"), Some("M0 0L1 1"));
    }

    #[test]
    fn test_map_element_keeps_kind() {
        let ev = EventKind::Start(path_el()).map_element(|mut el| {
            el.remove_attr("fill");
            el
        });
        match ev {
            EventKind::Start(el) => assert!(!el.has_attr("fill")),
            other => panic!("unexpected event {other:?}"),
        }
        let ev = EventKind::End("path".into()).map_element(|_| unreachable!());
        assert_eq!(ev, EventKind::End("path".into()));
    }

    #[test]
    fn test_elements_named() {
        let list: EventList = [
            EventKind::Start(RawElement("svg".into(), vec![])),
            EventKind::Empty(path_el()),
            EventKind::Empty(RawElement("rect".into(), vec![])),
            EventKind::End("svg".into()),
        ]
        .into_iter()
        .collect();
        assert_eq!(list.elements_named("path").count(), 1);
        assert_eq!(list.elements_named("circle").count(), 0);
    }
}
