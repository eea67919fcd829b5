use super::{EventKind, EventList, RawElement};
use crate::errors::{Error, Result};

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event as XmlEvent};
use quick_xml::{Reader, Writer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawXmlEvent(XmlEvent<'static>);

impl TryFrom<XmlEvent<'_>> for EventKind {
    type Error = Error;
    fn try_from(event: XmlEvent) -> Result<Self> {
        let res = match event {
            XmlEvent::Empty(bs) => EventKind::Empty(bs.try_into()?),
            XmlEvent::Start(bs) => EventKind::Start(bs.try_into()?),
            XmlEvent::End(e) => {
                let name = String::from_utf8(e.name().into_inner().to_vec())?;
                EventKind::End(name)
            }
            XmlEvent::Text(t) => {
                let content = String::from_utf8(t.into_inner().to_vec())?;
                EventKind::Text(content)
            }
            XmlEvent::CData(c) => {
                let content = String::from_utf8(c.into_inner().to_vec())?;
                EventKind::CData(content)
            }
            XmlEvent::Comment(c) => {
                let content = String::from_utf8(c.into_inner().to_vec())?;
                EventKind::Comment(content)
            }
            other => EventKind::Other(RawXmlEvent(other.into_owned())),
        };
        Ok(res)
    }
}

impl<'a> From<EventKind> for XmlEvent<'a> {
    fn from(ev: EventKind) -> XmlEvent<'a> {
        match ev {
            EventKind::Empty(e) => XmlEvent::Empty(e.into()),
            EventKind::Start(e) => XmlEvent::Start(e.into()),
            EventKind::Comment(content) => XmlEvent::Comment(BytesText::from_escaped(content)),
            // Text is held as it appeared in the source, so is already escaped
            EventKind::Text(content) => XmlEvent::Text(BytesText::from_escaped(content)),
            EventKind::CData(content) => XmlEvent::CData(BytesCData::new(content)),
            EventKind::End(name) => XmlEvent::End(BytesEnd::new(name)),
            EventKind::Other(event) => event.0,
        }
    }
}

impl TryFrom<BytesStart<'_>> for RawElement {
    type Error = Error;

    /// Build a `RawElement` from a `BytesStart` value. Failures here are low-level
    /// XML errors (e.g. duplicate or malformed attributes, non-UTF8).
    fn try_from(e: BytesStart) -> Result<Self> {
        let name = String::from_utf8(e.name().into_inner().to_vec())?;
        let attrs: Result<Vec<(String, String)>> = e
            .attributes()
            .map(move |a| {
                let aa = a.map_err(|e| Error::Parse(e.to_string()))?;
                let key = String::from_utf8(aa.key.into_inner().to_vec())?;
                let value = aa
                    .unescape_value()
                    .map_err(|e| Error::Parse(e.to_string()))?
                    .into_owned();
                Ok((key, value))
            })
            .collect();
        Ok(Self(name, attrs?))
    }
}

impl From<RawElement> for BytesStart<'static> {
    fn from(e: RawElement) -> Self {
        let mut bs = BytesStart::new(e.0);
        for (k, v) in &e.1 {
            // (&str, &str) conversion escapes the value
            bs.push_attribute((k.as_str(), v.as_str()));
        }
        bs
    }
}

fn line_at(s: &str, pos: u64) -> usize {
    let end = usize::try_from(pos).unwrap_or(usize::MAX).min(s.len());
    s.as_bytes()[..end].iter().filter(|&&c| c == b'\n').count() + 1
}

impl EventList {
    /// Parse `s` as a strict XML document.
    ///
    /// Mismatched or unclosed tags, and input containing no element at all,
    /// are reported as `Error::Parse`.
    pub fn parse(s: &str) -> Result<Self> {
        let mut reader = Reader::from_str(s);

        let mut events = Vec::new();
        // Names of currently open elements
        let mut open = Vec::new();
        let mut seen_element = false;

        loop {
            let ev = reader.read_event().map_err(|e| {
                let line = line_at(s, reader.buffer_position());
                Error::Parse(format!("XML error near line {line}: {e}"))
            })?;
            if matches!(ev, XmlEvent::Eof) {
                break;
            }
            let ev: EventKind = ev.try_into()?;

            match &ev {
                EventKind::Start(el) => {
                    open.push(el.name().to_string());
                    seen_element = true;
                }
                EventKind::Empty(_) => seen_element = true,
                EventKind::End(name) => match open.pop() {
                    Some(start) if &start == name => {}
                    Some(start) => {
                        return Err(Error::Parse(format!(
                            "expected </{start}>, found </{name}>"
                        )))
                    }
                    None => return Err(Error::Parse(format!("unexpected </{name}>"))),
                },
                _ => {}
            }
            events.push(ev);
        }

        if let Some(name) = open.pop() {
            return Err(Error::Parse(format!("unclosed element <{name}>")));
        }
        if !seen_element {
            return Err(Error::Parse("no root element".into()));
        }

        Ok(Self { events })
    }

    /// Serialize the event list back to an XML string.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.events {
            writer
                .write_event(event.clone())
                .map_err(Error::from_err)?;
        }
        Ok(String::from_utf8(writer.into_inner())?)
    }
}
