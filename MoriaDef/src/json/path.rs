//! Dotted property paths through nested property arrays
//!
//! A record's properties are an array of `{"Name": ..., "Value": ...}`
//! objects, and a struct property nests another such array in its `Value`.
//! `Outer.Inner` descends into `Outer`'s `Value` and targets `Inner` there.
//! A segment may carry an index, `StageDataList[1]`, to pick one element of
//! an array property before descending.

use std::fmt;

use serde_json::{Map, Value};

/// One `.`-separated segment of a property path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Property name to match against `Name`
    pub name: String,
    /// Optional element index (`Name[i]`)
    pub index: Option<usize>,
}

impl PathSegment {
    fn parse(segment: &str) -> Self {
        if let Some(open) = segment.find('[')
            && let Some(inner) = segment[open + 1..].strip_suffix(']')
            && open > 0
            && !inner.is_empty()
            && inner.bytes().all(|b| b.is_ascii_digit())
            && segment[..open]
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_')
            && let Ok(index) = inner.parse()
        {
            return Self {
                name: segment[..open].to_string(),
                index: Some(index),
            };
        }

        Self {
            name: segment.to_string(),
            index: None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{index}]", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A parsed property path such as `Outer.Inner` or `Stages[1].Points`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    /// Parse a dotted path. Returns `None` for an empty path.
    pub fn parse(path: &str) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        Some(Self {
            segments: path.split('.').map(PathSegment::parse).collect(),
        })
    }

    /// All segments, root first
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The final segment, naming the property to read or write
    pub fn leaf(&self) -> &PathSegment {
        // parse() never produces an empty segment list
        &self.segments[self.segments.len() - 1]
    }

    /// Walk every segment but the last.
    ///
    /// Returns the property array that should contain the leaf, or `None`
    /// when a segment is missing or its value is not an array.
    pub fn resolve<'a>(&self, properties: &'a mut Vec<Value>) -> Option<&'a mut Vec<Value>> {
        if properties.is_empty() {
            return None;
        }
        let (_, parents) = self.segments.split_last()?;
        let mut current = properties;
        for segment in parents {
            current = descend(current, segment)?;
        }
        Some(current)
    }

    /// Resolve the path down to the object holding the leaf's `Value` key.
    ///
    /// For a plain leaf this is the property object itself (its `Value` may be
    /// absent). For an indexed leaf it is element `i` of the property's array,
    /// which must be an object that already carries a `Value`.
    pub fn resolve_slot<'a>(&self, properties: &'a mut Vec<Value>) -> Option<&'a mut Map<String, Value>> {
        let parent = self.resolve(properties)?;
        let leaf = self.leaf();
        let property = find_property_mut(parent, &leaf.name)?;

        match leaf.index {
            None => property.as_object_mut(),
            Some(index) => {
                let element = property
                    .get_mut("Value")?
                    .as_array_mut()?
                    .get_mut(index)?
                    .as_object_mut()?;
                element.contains_key("Value").then_some(element)
            }
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Find the first property object whose `Name` equals `name`
pub fn find_property_mut<'a>(properties: &'a mut [Value], name: &str) -> Option<&'a mut Value> {
    properties
        .iter_mut()
        .find(|p| super::str_field(p, "Name") == Some(name))
}

/// Step from one property array into the nested array of `segment`
fn descend<'a>(properties: &'a mut [Value], segment: &PathSegment) -> Option<&'a mut Vec<Value>> {
    let value = find_property_mut(properties, &segment.name)?.get_mut("Value")?;

    let Some(index) = segment.index else {
        return value.as_array_mut();
    };

    let element = value.as_array_mut()?.get_mut(index)?;
    if element.get("Value").is_some() {
        element.get_mut("Value")?.as_array_mut()
    } else {
        element.as_array_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Vec<Value> {
        match value {
            Value::Array(items) => items,
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn test_parse_segments() {
        let path = PropertyPath::parse("Stages[1].Points").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment { name: "Stages".into(), index: Some(1) },
                PathSegment { name: "Points".into(), index: None },
            ]
        );
        assert_eq!(path.to_string(), "Stages[1].Points");

        // Not an index: kept literally
        let odd = PropertyPath::parse("Weird[x]").unwrap();
        assert_eq!(odd.leaf().name, "Weird[x]");
        assert!(PropertyPath::parse("").is_none());
    }

    #[test]
    fn test_resolve_top_level() {
        let mut properties = props(json!([{"Name": "BurnTime", "Value": 10}]));
        let path = PropertyPath::parse("BurnTime").unwrap();

        let slot = path.resolve_slot(&mut properties).unwrap();
        assert_eq!(slot["Value"], json!(10));
    }

    #[test]
    fn test_resolve_nested() {
        let mut properties = props(json!([
            {"Name": "Outer", "Value": [{"Name": "Inner", "Value": 5.0}]}
        ]));
        let path = PropertyPath::parse("Outer.Inner").unwrap();

        let parent = path.resolve(&mut properties).unwrap();
        assert_eq!(parent.len(), 1);
        assert_eq!(parent[0]["Name"], json!("Inner"));
    }

    #[test]
    fn test_resolve_through_scalar_fails() {
        let mut properties = props(json!([{"Name": "Outer", "Value": 3}]));
        let path = PropertyPath::parse("Outer.Inner").unwrap();
        assert!(path.resolve(&mut properties).is_none());

        let missing = PropertyPath::parse("Nope.Inner").unwrap();
        assert!(missing.resolve(&mut properties).is_none());
    }

    #[test]
    fn test_resolve_empty_properties() {
        let mut properties = Vec::new();
        let path = PropertyPath::parse("Anything").unwrap();
        assert!(path.resolve(&mut properties).is_none());
    }

    #[test]
    fn test_resolve_indexed_segment() {
        let mut properties = props(json!([
            {"Name": "Stages", "Value": [
                {"Name": "0", "Value": [{"Name": "Points", "Value": 1}]},
                {"Name": "1", "Value": [{"Name": "Points", "Value": 2}]}
            ]}
        ]));
        let path = PropertyPath::parse("Stages[1].Points").unwrap();
        let slot = path.resolve_slot(&mut properties).unwrap();
        assert_eq!(slot["Value"], json!(2));

        let out_of_range = PropertyPath::parse("Stages[5].Points").unwrap();
        assert!(out_of_range.resolve_slot(&mut properties).is_none());
    }

    #[test]
    fn test_resolve_indexed_leaf() {
        let mut properties = props(json!([
            {"Name": "Costs", "Value": [{"Value": 3}, {"Value": 4}, "bare"]}
        ]));
        let path = PropertyPath::parse("Costs[1]").unwrap();
        assert_eq!(path.resolve_slot(&mut properties).unwrap()["Value"], json!(4));

        let bare = PropertyPath::parse("Costs[2]").unwrap();
        assert!(bare.resolve_slot(&mut properties).is_none());
    }
}
