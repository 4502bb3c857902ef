use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Port published by the web server container and admitted by the ingress rule.
pub const HTTP_PORT: Port = Port::Tcp(80);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    Tcp(u16),
    Udp(u16),
}

impl Port {
    pub fn number(&self) -> u16 {
        match self {
            Port::Tcp(port) | Port::Udp(port) => *port,
        }
    }

    pub fn protocol(&self) -> &'static str {
        match self {
            Port::Tcp(_) => "tcp",
            Port::Udp(_) => "udp",
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.protocol(), self.number())
    }
}

impl Serialize for Port {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Port {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PortVisitor;

        impl Visitor<'_> for PortVisitor {
            type Value = Port;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(
                    "a string with protocol:port or just a number where tcp will be assumed",
                )
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u16::try_from(v)
                    .map(Port::Tcp)
                    .map_err(|_| de::Error::custom(format!("port {v} is out of range")))
            }

            fn visit_str<E>(self, value: &str) -> Result<Port, E>
            where
                E: de::Error,
            {
                if let Ok(port) = value.parse::<u16>() {
                    return Ok(Port::Tcp(port));
                }

                let Some((proto, port_str)) = value.split_once(':') else {
                    return Err(de::Error::custom("invalid port format"));
                };
                let port = port_str.parse::<u16>().map_err(de::Error::custom)?;
                match proto.to_ascii_lowercase().as_str() {
                    "tcp" => Ok(Port::Tcp(port)),
                    "udp" => Ok(Port::Udp(port)),
                    _ => Err(de::Error::custom("protocol must be 'tcp' or 'udp'")),
                }
            }
        }

        deserializer.deserialize_any(PortVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_protocol_prefix() {
        assert_eq!(serde_json::to_string(&HTTP_PORT).unwrap(), "\"tcp:80\"");
        assert_eq!(Port::Udp(53).to_string(), "udp:53");
    }

    #[test]
    fn bare_number_assumes_tcp() {
        let port: Port = serde_json::from_str("8080").unwrap();
        assert_eq!(port, Port::Tcp(8080));
        let port: Port = serde_json::from_str("\"443\"").unwrap();
        assert_eq!(port, Port::Tcp(443));
    }

    #[test]
    fn protocol_is_case_insensitive() {
        let port: Port = serde_json::from_str("\"UDP:53\"").unwrap();
        assert_eq!(port, Port::Udp(53));
    }

    #[test]
    fn rejects_unknown_protocol_and_out_of_range() {
        assert!(serde_json::from_str::<Port>("\"sctp:80\"").is_err());
        assert!(serde_json::from_str::<Port>("70000").is_err());
        assert!(serde_json::from_str::<Port>("\"http\"").is_err());
    }
}
