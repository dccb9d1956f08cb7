//! Conversion of a record set into sitemap text.
//!
//! Every function here is pure: records in, text out. Records can be any
//! `Serialize` type that lowers to a flat key/value mapping; [`PageRecord`]
//! is the one the generator uses.
//!
//! [`PageRecord`]: crate::PageRecord

use crate::{
    config::Config,
    error::{Error, Result},
    format::SitemapFormat,
};
use quick_xml::{
    Writer as XmlWriter,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

/// Default namespace of a sitemap `urlset`.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// XML Schema instance namespace.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Value of `xsi:schemaLocation` on the `urlset` element.
pub const SCHEMA_LOCATION: &str = "http://www.sitemaps.org/schemas/sitemap/0.9 \
                                   http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd";

/// Default CSV column delimiter.
pub const DEFAULT_CSV_DELIMITER: &str = ";";

/// Default JSON indentation width.
pub const DEFAULT_JSON_INDENT: usize = 4;

const ROOT_ELEMENT: &str = "urlset";
const RECORD_ELEMENT: &str = "url";
const ITEM_ELEMENT: &str = "item";

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Dispatches a record set to the serializer for a format.
#[derive(Debug, Clone)]
pub struct Serializer {
    csv_delimiter: String,
    json_indent: usize,
}

impl Default for Serializer {
    fn default() -> Self {
        Self {
            csv_delimiter: DEFAULT_CSV_DELIMITER.to_string(),
            json_indent: DEFAULT_JSON_INDENT,
        }
    }
}

impl Serializer {
    /// Creates a serializer from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            csv_delimiter: config.csv_delimiter.clone(),
            json_indent: config.json_indent,
        }
    }

    /// Encodes `records` in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the records cannot be represented.
    pub fn serialize<T: Serialize>(&self, records: &[T], format: SitemapFormat) -> Result<String> {
        match format {
            SitemapFormat::Xml => to_xml(records),
            SitemapFormat::Csv => to_csv(records, &self.csv_delimiter),
            SitemapFormat::Json => to_json(records, self.json_indent),
        }
    }

    /// Encodes `records` in the format named by `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for an unknown tag, before any
    /// encoding happens, or [`Error::Encoding`] as for [`Serializer::serialize`].
    pub fn serialize_tag<T: Serialize>(&self, records: &[T], tag: &str) -> Result<String> {
        let format = tag.parse::<SitemapFormat>()?;
        self.serialize(records, format)
    }
}

/// Builds a sitemap protocol document: one `url` element per record, one
/// child element per key.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if a key is not a valid element name or the
/// document cannot be completed.
pub fn to_xml<T: Serialize>(records: &[T]) -> Result<String> {
    let rows = lower(records, SitemapFormat::Xml)?;

    let mut xml = XmlDocument::new()?;
    let root = BytesStart::new(ROOT_ELEMENT).with_attributes([
        ("xmlns:xsi", XSI_NAMESPACE),
        ("xmlns", SITEMAP_NAMESPACE),
        ("xsi:schemaLocation", SCHEMA_LOCATION),
    ]);

    if rows.is_empty() {
        xml.write(Event::Empty(root))?;
    } else {
        xml.start(root)?;
        for row in &rows {
            write_object(&mut xml, RECORD_ELEMENT, row)?;
        }
        xml.end()?;
    }

    xml.finish()
}

fn write_object(xml: &mut XmlDocument, name: &str, map: &Map<String, Value>) -> Result<()> {
    if map.is_empty() {
        return xml.empty(name);
    }

    xml.start(BytesStart::new(name))?;
    for (key, value) in map {
        write_value(xml, key, value)?;
    }
    xml.end()
}

fn write_value(xml: &mut XmlDocument, name: &str, value: &Value) -> Result<()> {
    match value {
        Value::Object(map) => write_object(xml, name, map),
        Value::Array(items) if items.is_empty() => xml.empty(name),
        Value::Array(items) => {
            xml.start(BytesStart::new(name))?;
            for item in items {
                write_value(xml, ITEM_ELEMENT, item)?;
            }
            xml.end()
        }
        scalar => {
            let text = scalar_text(scalar);
            if text.is_empty() {
                return xml.empty(name);
            }

            xml.start(BytesStart::new(name))?;
            xml.write(Event::Text(BytesText::new(&text)))?;
            xml.end()
        }
    }
}

/// A `quick_xml::Writer` that tracks open elements.
///
/// [`XmlDocument::finish`] fails unless every started element was ended.
struct XmlDocument {
    writer: XmlWriter<Vec<u8>>,
    open: Vec<String>,
}

impl XmlDocument {
    fn new() -> Result<Self> {
        let mut document = Self {
            writer: XmlWriter::new(Vec::new()),
            open: Vec::new(),
        };
        document.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        document.writer.get_mut().push(b'\n');
        Ok(document)
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::encoding("xml", e.to_string()))
    }

    fn start(&mut self, start: BytesStart<'_>) -> Result<()> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        check_name(&name)?;
        self.write(Event::Start(start))?;
        self.open.push(name);
        Ok(())
    }

    fn empty(&mut self, name: &str) -> Result<()> {
        check_name(name)?;
        self.write(Event::Empty(BytesStart::new(name)))
    }

    fn end(&mut self) -> Result<()> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| Error::encoding("xml", "end tag with no open element"))?;
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn finish(self) -> Result<String> {
        if let Some(name) = self.open.last() {
            return Err(Error::encoding(
                "xml",
                format!("element <{name}> was never closed"),
            ));
        }

        let mut xml = String::from_utf8(self.writer.into_inner())
            .map_err(|e| Error::encoding("xml", e.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }
}

/// Rejects keys that cannot be written as element names.
fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));

    if valid {
        Ok(())
    } else {
        Err(Error::encoding("xml", format!("'{name}' is not a valid XML name")))
    }
}

/// Builds a delimited table: a header line of keys taken from the first
/// record, then one line per record.
///
/// Values are written verbatim. A value containing the delimiter or a line
/// break produces a row that will not parse back into the same columns.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if a record's keys differ from the header or a
/// value is nested.
pub fn to_csv<T: Serialize>(records: &[T], delimiter: &str) -> Result<String> {
    let rows = lower(records, SitemapFormat::Csv)?;
    let header: Vec<&str> = rows
        .first()
        .map(|row| row.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut csv = header.join(delimiter);
    csv.push_str(LINE_ENDING);

    for (index, row) in rows.iter().enumerate() {
        if row.len() != header.len() || row.keys().zip(&header).any(|(key, title)| key != title) {
            return Err(Error::encoding(
                "csv",
                format!("record {index} does not have the header keys {header:?}"),
            ));
        }

        let cells = row
            .iter()
            .map(|(key, value)| match value {
                Value::Object(_) | Value::Array(_) => Err(Error::encoding(
                    "csv",
                    format!("record {index} has a nested value under '{key}'"),
                )),
                scalar => Ok(scalar_text(scalar)),
            })
            .collect::<Result<Vec<_>>>()?;

        csv.push_str(&cells.join(delimiter));
        csv.push_str(LINE_ENDING);
    }

    Ok(csv)
}

/// Builds a pretty-printed JSON array, keys in record field order.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if serialization fails or yields nothing.
pub fn to_json<T: Serialize>(records: &[T], indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    records.serialize(&mut ser)?;

    let json = String::from_utf8(buf).map_err(|e| Error::encoding("json", e.to_string()))?;
    if json.is_empty() {
        return Err(Error::encoding("json", "serializer produced no output"));
    }

    Ok(json)
}

/// Lowers each record to an ordered key/value mapping.
fn lower<T: Serialize>(records: &[T], format: SitemapFormat) -> Result<Vec<Map<String, Value>>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| match serde_json::to_value(record) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(Error::encoding(
                format.as_str(),
                format!("record {index} is not a key/value mapping: {other}"),
            )),
            Err(e) => Err(Error::encoding(format.as_str(), e.to_string())),
        })
        .collect()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        record::{ChangeFreq, PageRecord, Priority},
        source::{PageSource, StaticPages},
    };
    use chrono::NaiveDate;
    use quick_xml::Reader;
    use std::collections::BTreeMap;

    fn pages() -> Vec<PageRecord> {
        StaticPages.pages().unwrap()
    }

    fn page(loc: &str) -> PageRecord {
        PageRecord::new(
            loc,
            NaiveDate::from_ymd_opt(2021, 3, 4).unwrap(),
            Priority::new(0.3).unwrap(),
            ChangeFreq::Monthly,
        )
    }

    /// Reads back `(key, value)` pairs of every `<url>` element.
    fn parse_urls(xml: &str) -> Vec<Vec<(String, String)>> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut urls = Vec::new();
        let mut current: Option<Vec<(String, String)>> = None;
        let mut field: Option<String> = None;

        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => {
                    let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                    if name == RECORD_ELEMENT {
                        current = Some(Vec::new());
                    } else if current.is_some() {
                        field = Some(name);
                    }
                }
                Event::Text(e) => {
                    if let (Some(fields), Some(name)) = (current.as_mut(), field.as_ref()) {
                        fields.push((name.clone(), e.unescape().unwrap().into_owned()));
                    }
                }
                Event::End(e) => {
                    if e.name().as_ref() == RECORD_ELEMENT.as_bytes() {
                        urls.push(current.take().unwrap());
                    } else {
                        field = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        urls
    }

    fn fields_of(record: &PageRecord) -> Vec<(String, String)> {
        vec![
            ("loc".to_string(), record.loc.clone()),
            ("lastmod".to_string(), record.lastmod.to_string()),
            ("priority".to_string(), record.priority.to_string()),
            ("changefreq".to_string(), record.changefreq.to_string()),
        ]
    }

    #[test]
    fn test_xml_empty_urlset() {
        let xml = to_xml::<PageRecord>(&[]).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset "));
        assert!(xml.trim_end().ends_with("/>"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_xml_namespaces() {
        let xml = to_xml(&pages()).unwrap();

        assert!(xml.contains(&format!("xmlns=\"{SITEMAP_NAMESPACE}\"")));
        assert!(xml.contains(&format!("xmlns:xsi=\"{XSI_NAMESPACE}\"")));
        assert!(xml.contains(&format!("xsi:schemaLocation=\"{SCHEMA_LOCATION}\"")));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_xml_round_trip() {
        let records = pages();
        let xml = to_xml(&records).unwrap();

        let expected: Vec<_> = records.iter().map(fields_of).collect();
        assert_eq!(parse_urls(&xml), expected);
    }

    #[test]
    fn test_xml_escapes_loc() {
        let records = vec![page("https://site.ru/search?q=a&b=<c>")];
        let xml = to_xml(&records).unwrap();

        assert!(xml.contains("<loc>https://site.ru/search?q=a&amp;b=&lt;c&gt;</loc>"));
        assert_eq!(parse_urls(&xml), vec![fields_of(&records[0])]);
    }

    #[test]
    fn test_xml_nested_values() {
        #[derive(Serialize)]
        struct Entry {
            loc: &'static str,
            images: Vec<BTreeMap<&'static str, &'static str>>,
        }

        let entry = Entry {
            loc: "https://site.ru/",
            images: vec![BTreeMap::from([("loc", "https://site.ru/a.png")])],
        };
        let xml = to_xml(&[entry]).unwrap();

        assert!(xml.contains(
            "<url><loc>https://site.ru/</loc><images><item><loc>https://site.ru/a.png</loc></item></images></url>"
        ));
    }

    #[test]
    fn test_xml_rejects_invalid_key() {
        let records = vec![BTreeMap::from([("not valid", "x")])];
        let err = to_xml(&records).unwrap_err();

        assert!(err.is_encoding());
    }

    #[test]
    fn test_xml_escapes_quotes() {
        let records = vec![page(r#"https://a/?x=1&y=<2>&q="it's""#)];
        let xml = to_xml(&records).unwrap();

        assert_eq!(parse_urls(&xml)[0][0].1, r#"https://a/?x=1&y=<2>&q="it's""#);
    }

    #[test]
    fn test_xml_document_unclosed_element() {
        let mut xml = XmlDocument::new().unwrap();
        xml.start(BytesStart::new("urlset")).unwrap();

        assert!(xml.finish().unwrap_err().is_encoding());
    }

    #[test]
    fn test_xml_document_unbalanced_end() {
        let mut xml = XmlDocument::new().unwrap();

        assert!(xml.end().unwrap_err().is_encoding());
    }

    #[test]
    fn test_xml_empty_values_self_close() {
        let records = vec![BTreeMap::from([("loc", "https://a/"), ("note", "")])];
        let xml = to_xml(&records).unwrap();

        assert!(xml.contains("<url><loc>https://a/</loc><note/></url>"));
    }

    #[test]
    fn test_csv_empty_header() {
        assert_eq!(to_csv::<PageRecord>(&[], ";").unwrap(), LINE_ENDING);
    }

    #[test]
    fn test_csv_header_line() {
        let csv = to_csv(&pages(), ";").unwrap();

        assert_eq!(csv.lines().next().unwrap(), "loc;lastmod;priority;changefreq");
        assert_eq!(csv.lines().nth(1).unwrap(), "https://site.ru/;2020-12-14;1;hourly");
        assert_eq!(csv.lines().count(), 7);
        assert!(csv.ends_with(LINE_ENDING));
    }

    #[test]
    fn test_csv_round_trip() {
        let records = pages();
        let csv = to_csv(&records, ";").unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(csv.as_bytes());

        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, ["loc", "lastmod", "priority", "changefreq"]);

        let rows: Vec<Vec<(String, String)>> = reader
            .records()
            .map(|row| {
                headers
                    .iter()
                    .cloned()
                    .zip(row.unwrap().iter().map(String::from))
                    .collect()
            })
            .collect();
        let expected: Vec<_> = records.iter().map(fields_of).collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_csv_custom_delimiter() {
        let csv = to_csv(&[page("https://a/")], ",").unwrap();
        assert_eq!(csv.lines().next().unwrap(), "loc,lastmod,priority,changefreq");
    }

    #[test]
    fn test_csv_writes_delimiter_verbatim() {
        let csv = to_csv(&[page("https://a/;b")], ";").unwrap();
        assert_eq!(csv.lines().nth(1).unwrap(), "https://a/;b;2021-03-04;0.3;monthly");
    }

    #[test]
    fn test_csv_rejects_mismatched_keys() {
        let records = vec![
            BTreeMap::from([("a", "1"), ("b", "2")]),
            BTreeMap::from([("a", "1"), ("c", "2")]),
        ];
        let err = to_csv(&records, ";").unwrap_err();

        assert!(err.is_encoding());
    }

    #[test]
    fn test_json_empty_array() {
        assert_eq!(to_json::<PageRecord>(&[], 4).unwrap(), "[]");
    }

    #[test]
    fn test_json_six_records() {
        let json = to_json(&pages(), 4).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let items = value.as_array().unwrap();

        assert_eq!(items.len(), 6);
        for item in items {
            let keys: Vec<_> = item.as_object().unwrap().keys().collect();
            assert_eq!(keys, ["loc", "lastmod", "priority", "changefreq"]);
        }
        assert_eq!(
            serde_json::to_string(&items[0]).unwrap(),
            r#"{"loc":"https://site.ru/","lastmod":"2020-12-14","priority":1,"changefreq":"hourly"}"#
        );
    }

    #[test]
    fn test_json_indentation() {
        let json = to_json(&pages(), 4).unwrap();
        let mut lines = json.lines();

        assert_eq!(lines.next(), Some("["));
        assert_eq!(lines.next(), Some("    {"));
        assert_eq!(lines.next(), Some("        \"loc\": \"https://site.ru/\","));
    }

    #[test]
    fn test_json_round_trip() {
        let records = pages();
        let json = to_json(&records, 4).unwrap();

        let parsed: Vec<PageRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_serialize_dispatch() {
        let serializer = Serializer::default();
        let records = pages();

        for format in SitemapFormat::ALL {
            let text = serializer.serialize(&records, format).unwrap();
            assert!(text.contains("https://site.ru/products/wii"));
        }
    }

    #[test]
    fn test_serialize_unknown_tag() {
        let err = Serializer::default()
            .serialize_tag(&pages(), "yaml")
            .unwrap_err();

        assert!(err.is_unsupported_format());
    }

    #[test]
    fn test_non_mapping_record() {
        let err = to_xml(&["just a string"]).unwrap_err();
        assert!(err.is_encoding());
    }
}
