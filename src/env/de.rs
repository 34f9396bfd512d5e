//! Deserialization of prefixed variables into a `serde` type.
//!
//! Every value stays a string until the target type asks for something
//! else, so `APP_NAME=123` still fills a `String` field.

use serde::de::value::{MapDeserializer, StringDeserializer};
use serde::de::{self, DeserializeOwned, Expected, IntoDeserializer, Unexpected, Visitor};

use super::os::ProcessEnv;
use super::set::{EnvSet, VALUE_TRIM_CHARS};
use super::typed::FromEnv;
use super::EnvError;

impl<E: ProcessEnv> EnvSet<E> {
    /// Deserializes every variable starting with `prefix` into `T`.
    ///
    /// Variables are gathered from all layers with the usual precedence. The
    /// prefix is stripped and the rest lowercased to form the field name, so
    /// with prefix `APP_`, `APP_DB_PORT` fills a field named `db_port`.
    ///
    /// Values are parsed as the field's type requires. Booleans accept the
    /// same literals as [`bool`](Self::bool); an empty value reads as `None`
    /// for optional fields.
    ///
    /// ## Example
    ///
    /// ```no_run
    /// use dragon_env::EnvSet;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Server {
    ///     host: String,
    ///     port: u16,
    /// }
    ///
    /// // With APP_HOST=localhost and APP_PORT=8080
    /// let server: Server = EnvSet::new().deserialize("APP_")?;
    /// # Ok::<(), dragon_env::EnvError>(())
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self, prefix: &str) -> Result<T, EnvError> {
        let fields = self.merged_vars().into_iter().filter_map(|(key, value)| {
            let field = key.strip_prefix(prefix)?;
            if field.is_empty() {
                return None;
            }
            let value = value.trim_matches(VALUE_TRIM_CHARS).to_string();
            Some((field.to_lowercase(), EnvValue(value)))
        });

        let map: MapDeserializer<'_, _, de::value::Error> = MapDeserializer::new(fields);
        Ok(T::deserialize(map)?)
    }
}

/// A single variable value, parsed on demand.
struct EnvValue(String);

impl EnvValue {
    // Names the expected type only; values may be secrets.
    fn invalid(&self, expected: &dyn Expected) -> de::value::Error {
        de::Error::invalid_type(Unexpected::Other("environment string"), expected)
    }
}

impl<'de> IntoDeserializer<'de, de::value::Error> for EnvValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                match self.0.parse() {
                    Ok(value) => visitor.$visit(value),
                    Err(_) => Err(self.invalid(&visitor)),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for EnvValue {
    type Error = de::value::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_string(self.0)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match bool::from_env("", &self.0) {
            Ok(value) => visitor.visit_bool(value),
            Err(_) => Err(self.invalid(&visitor)),
        }
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
        deserialize_char => visit_char,
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.0.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        let variant: StringDeserializer<Self::Error> = self.0.into_deserializer();
        visitor.visit_enum(variant)
    }

    serde::forward_to_deserialize_any! {
        str string bytes byte_buf unit unit_struct seq tuple tuple_struct
        map struct identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::InMemoryEnv;
    use serde::Deserialize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Server {
        name: String,
        port: u16,
        debug: bool,
        ratio: Option<f64>,
    }

    fn env_with(vars: &[(&str, &str)]) -> EnvSet<InMemoryEnv> {
        EnvSet::builder()
            .with_os(InMemoryEnv::with_vars(vars.iter().copied()))
            .build()
    }

    #[test]
    fn test_deserialize_across_layers() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "APP_NAME=demo\nAPP_PORT=1").unwrap();

        let mut env = EnvSet::builder()
            .with_file(file.path())
            .with_os(InMemoryEnv::with_vars([("APP_PORT", "8080"), ("OTHER", "x")]))
            .build();
        env.load_file().unwrap();
        env.set(false, "APP_DEBUG", "TRUE").unwrap();

        let server: Server = env.deserialize("APP_").unwrap();

        assert_eq!(
            server,
            Server {
                name: "demo".into(),
                port: 8080,
                debug: true,
                ratio: None,
            }
        );
    }

    #[test]
    fn test_numeric_value_fills_string_field() {
        let env = env_with(&[
            ("APP_NAME", "123"),
            ("APP_PORT", "80"),
            ("APP_DEBUG", "0"),
            ("APP_RATIO", "0.5"),
        ]);

        let server: Server = env.deserialize("APP_").unwrap();

        assert_eq!(server.name, "123");
        assert!(!server.debug);
        assert_eq!(server.ratio, Some(0.5));
    }

    #[test]
    fn test_empty_value_is_none() {
        let env = env_with(&[
            ("APP_NAME", "demo"),
            ("APP_PORT", "80"),
            ("APP_DEBUG", "f"),
            ("APP_RATIO", ""),
        ]);

        let server: Server = env.deserialize("APP_").unwrap();
        assert_eq!(server.ratio, None);
    }

    #[test]
    fn test_enum_and_newtype_fields() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "lowercase")]
        enum Mode {
            Fast,
            Safe,
        }

        #[derive(Debug, Deserialize, PartialEq)]
        struct Port(u16);

        #[derive(Debug, Deserialize)]
        struct Settings {
            mode: Mode,
            port: Port,
        }

        let env = env_with(&[("SVC_MODE", "safe"), ("SVC_PORT", "9000")]);
        let settings: Settings = env.deserialize("SVC_").unwrap();

        assert_eq!(settings.mode, Mode::Safe);
        assert_eq!(settings.port, Port(9000));
    }

    #[test]
    fn test_invalid_number_fails_without_value_in_message() {
        let env = env_with(&[
            ("APP_NAME", "demo"),
            ("APP_PORT", "s3cr3t"),
            ("APP_DEBUG", "true"),
        ]);

        let err = env.deserialize::<Server>("APP_").unwrap_err();

        assert!(matches!(err, EnvError::Deserialize(_)));
        assert!(!err.to_string().contains("s3cr3t"));
    }

    #[test]
    fn test_deserialize_missing_field_fails() {
        let env = env_with(&[("APP_NAME", "demo"), ("APP_DEBUG", "false")]);

        let result = env.deserialize::<Server>("APP_");
        assert!(matches!(result, Err(EnvError::Deserialize(_))));
    }
}
