// ── Field codecs for the device's JSON dialect ──
//
// The bassinet encodes booleans three different ways (0/1, "true"/"false",
// "on"/"off") and uses -1 as the "no value" marker for durations. Each
// submodule is a `#[serde(with = "...")]` codec that accepts the wire form
// and the plain JSON form alike.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serializer};

/// Either a JSON bool or a JSON string, before interpretation.
#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrStr {
    Bool(bool),
    Str(String),
}

/// `1` / `0` integers (safety clips).
pub mod int_bool {
    use super::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Bool(bool),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(i) => i != 0,
            Raw::Bool(b) => b,
        })
    }
}

/// `"true"` / `"false"` strings (session flag).
pub mod string_bool {
    use super::{BoolOrStr, Deserialize, Deserializer, Serializer, Unexpected, de};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match BoolOrStr::deserialize(deserializer)? {
            BoolOrStr::Bool(b) => Ok(b),
            BoolOrStr::Str(s) => match s.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(de::Error::invalid_value(
                    Unexpected::Str(other),
                    &"\"true\" or \"false\"",
                )),
            },
        }
    }
}

/// `"on"` / `"off"` strings (hold, audio, white noise, weaning).
pub mod on_off {
    use super::{BoolOrStr, Deserialize, Deserializer, Serializer, Unexpected, de};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "on" } else { "off" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match BoolOrStr::deserialize(deserializer)? {
            BoolOrStr::Bool(b) => Ok(b),
            BoolOrStr::Str(s) => match s.as_str() {
                "on" => Ok(true),
                "off" => Ok(false),
                other => Err(de::Error::invalid_value(
                    Unexpected::Str(other),
                    &"\"on\" or \"off\"",
                )),
            },
        }
    }
}

/// Milliseconds, negative meaning "absent".
pub mod optional_millis {
    use chrono::TimeDelta;

    use super::{Deserialize, Deserializer, Serializer, Unexpected, de};

    pub fn serialize<S: Serializer>(
        value: &Option<TimeDelta>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.map_or(-1, |d| d.num_milliseconds()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<TimeDelta>, D::Error> {
        let ms = Option::<i64>::deserialize(deserializer)?;
        match ms {
            None => Ok(None),
            Some(ms) if ms < 0 => Ok(None),
            Some(ms) => TimeDelta::try_milliseconds(ms).map(Some).ok_or_else(|| {
                de::Error::invalid_value(Unexpected::Signed(ms), &"a representable duration")
            }),
        }
    }
}

/// Whole seconds, negative meaning "absent".
pub mod optional_seconds {
    use chrono::TimeDelta;

    use super::{Deserialize, Deserializer, Serializer, Unexpected, de};

    pub fn serialize<S: Serializer>(
        value: &Option<TimeDelta>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.map_or(-1, |d| d.num_seconds()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<TimeDelta>, D::Error> {
        let secs = Option::<i64>::deserialize(deserializer)?;
        match secs {
            None => Ok(None),
            Some(secs) if secs < 0 => Ok(None),
            Some(secs) => TimeDelta::try_seconds(secs).map(Some).ok_or_else(|| {
                de::Error::invalid_value(Unexpected::Signed(secs), &"a representable duration")
            }),
        }
    }
}

/// Identifiers that arrive as either strings or numbers.
pub mod string_or_number {
    use super::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Uint(u64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s,
            Raw::Int(i) => i.to_string(),
            Raw::Uint(u) => u.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Probe {
        #[serde(with = "super::int_bool")]
        clip: bool,
        #[serde(with = "super::string_bool")]
        active: bool,
        #[serde(with = "super::on_off")]
        hold: bool,
        #[serde(with = "super::optional_millis")]
        since: Option<TimeDelta>,
        #[serde(default, with = "super::optional_seconds")]
        left: Option<TimeDelta>,
    }

    #[test]
    fn decodes_device_dialect() {
        let probe: Probe = serde_json::from_str(
            r#"{"clip": 1, "active": "true", "hold": "off", "since": 1500, "left": 30}"#,
        )
        .unwrap();
        assert!(probe.clip);
        assert!(probe.active);
        assert!(!probe.hold);
        assert_eq!(probe.since, Some(TimeDelta::milliseconds(1500)));
        assert_eq!(probe.left, Some(TimeDelta::seconds(30)));
    }

    #[test]
    fn decodes_plain_json_booleans() {
        let probe: Probe = serde_json::from_str(
            r#"{"clip": false, "active": false, "hold": true, "since": -1}"#,
        )
        .unwrap();
        assert!(!probe.clip);
        assert!(!probe.active);
        assert!(probe.hold);
        assert_eq!(probe.since, None);
        assert_eq!(probe.left, None);
    }

    #[test]
    fn rejects_unknown_switch_value() {
        let result = serde_json::from_str::<Probe>(
            r#"{"clip": 0, "active": "true", "hold": "maybe", "since": 0}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn encodes_back_to_device_dialect() {
        let probe = Probe {
            clip: true,
            active: false,
            hold: true,
            since: None,
            left: Some(TimeDelta::seconds(5)),
        };
        let json = serde_json::to_value(&probe).unwrap();
        assert_eq!(json["clip"], 1);
        assert_eq!(json["active"], "false");
        assert_eq!(json["hold"], "on");
        assert_eq!(json["since"], -1);
        assert_eq!(json["left"], 5);
    }
}
