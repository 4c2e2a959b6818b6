use std::fmt;

#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy)]
pub enum QosReliability {
    #[default]
    Reliable,
    BestEffort,
}

impl fmt::Display for QosReliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reliable => write!(f, "Reliable"),
            Self::BestEffort => write!(f, "Best Effort"),
        }
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum QosHistory {
    KeepLast(usize),
    KeepAll,
}

impl Default for QosHistory {
    fn default() -> Self {
        Self::KeepLast(10)
    }
}

impl fmt::Display for QosHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepLast(depth) => write!(f, "Keep Last ({})", depth),
            Self::KeepAll => write!(f, "Keep All"),
        }
    }
}

#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy)]
pub enum QosDurability {
    TransientLocal,
    #[default]
    Volatile,
}

impl fmt::Display for QosDurability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransientLocal => write!(f, "Transient Local"),
            Self::Volatile => write!(f, "Volatile"),
        }
    }
}

#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy)]
pub struct QosProfile {
    pub reliability: QosReliability,
    pub durability: QosDurability,
    pub history: QosHistory,
}

impl QosProfile {
    /// Sensor-style profile: latest samples only, losses tolerated.
    pub fn best_effort() -> Self {
        Self {
            reliability: QosReliability::BestEffort,
            ..Default::default()
        }
    }

    pub fn keep_last(depth: usize) -> Self {
        Self {
            history: QosHistory::KeepLast(depth),
            ..Default::default()
        }
    }
}

impl fmt::Display for QosProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QoS({}, {}, {})",
            self.reliability, self.durability, self.history
        )
    }
}

const QOS_DELIMITER: &str = ":";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QosDecodeError {
    IncompleteQos,
    InvalidReliability,
    InvalidDurability,
    InvalidHistory,
}

impl fmt::Display for QosDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompleteQos => write!(f, "incomplete QoS string"),
            Self::InvalidReliability => write!(f, "invalid reliability field"),
            Self::InvalidDurability => write!(f, "invalid durability field"),
            Self::InvalidHistory => write!(f, "invalid history field"),
        }
    }
}

impl std::error::Error for QosDecodeError {}

impl QosProfile {
    // Field layout follows rmw_zenoh:
    // <Reliability>:<Durability>:<HistoryKind>,<HistoryDepth>:<Deadline>:<Lifespan>:<Liveliness>
    // Deadline, lifespan and liveliness are not modelled and always encode as defaults.
    pub fn encode(&self) -> String {
        let default_qos = Self::default();

        let reliability = if self.reliability != default_qos.reliability {
            match self.reliability {
                QosReliability::Reliable => "1",
                QosReliability::BestEffort => "2",
            }
        } else {
            ""
        };

        let durability = if self.durability != default_qos.durability {
            match self.durability {
                QosDurability::TransientLocal => "1",
                QosDurability::Volatile => "2",
            }
        } else {
            ""
        };

        let history = match self.history {
            QosHistory::KeepLast(depth) => {
                if self.history != default_qos.history {
                    format!("1,{}", depth)
                } else {
                    format!(",{}", depth)
                }
            }
            QosHistory::KeepAll => "2,".to_string(),
        };

        format!("{}:{}:{}:,:,:,,", reliability, durability, history)
    }

    pub fn decode(encoded: impl AsRef<str>) -> Result<Self, QosDecodeError> {
        let mut fields = encoded.as_ref().split(QOS_DELIMITER);
        let reliability = match fields.next() {
            Some(x) => match x {
                "0" | "" => QosReliability::default(),
                "1" => QosReliability::Reliable,
                "2" => QosReliability::BestEffort,
                _ => return Err(QosDecodeError::InvalidReliability),
            },
            None => return Err(QosDecodeError::IncompleteQos),
        };
        let durability = match fields.next() {
            Some(x) => match x {
                "0" | "" => QosDurability::default(),
                "1" => QosDurability::TransientLocal,
                "2" => QosDurability::Volatile,
                _ => return Err(QosDecodeError::InvalidDurability),
            },
            None => return Err(QosDecodeError::IncompleteQos),
        };
        let history = match fields.next() {
            Some(x) => match x {
                "," | "" => QosHistory::default(),
                x => {
                    let mut iter = x.split(",");
                    let kind = iter.next().ok_or(QosDecodeError::IncompleteQos)?;
                    let depth = iter.next().ok_or(QosDecodeError::IncompleteQos)?;
                    match (kind, depth) {
                        ("", d) | ("0", d) | ("1", d) => d
                            .parse()
                            .map(QosHistory::KeepLast)
                            .map_err(|_| QosDecodeError::InvalidHistory)?,
                        ("2", _) => QosHistory::KeepAll,
                        _ => return Err(QosDecodeError::InvalidHistory),
                    }
                }
            },
            None => return Err(QosDecodeError::IncompleteQos),
        };
        // Trailing deadline/lifespan/liveliness fields are accepted and ignored.

        Ok(Self {
            reliability,
            durability,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_depth_is_ten() {
        assert_eq!(QosProfile::default().history, QosHistory::KeepLast(10));
    }

    #[test]
    fn encode_decode_roundtrip() {
        let profiles = [
            QosProfile::default(),
            QosProfile::best_effort(),
            QosProfile::keep_last(1),
            QosProfile {
                reliability: QosReliability::BestEffort,
                durability: QosDurability::TransientLocal,
                history: QosHistory::KeepAll,
            },
        ];
        for qos in profiles {
            assert_eq!(QosProfile::decode(qos.encode()).unwrap(), qos);
        }
    }

    #[test]
    fn default_profile_encodes_compactly() {
        assert_eq!(QosProfile::default().encode(), "::,10:,:,:,,");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(QosProfile::decode("9:::::").is_err());
        assert!(QosProfile::decode(":x:,10:,:,:,,").is_err());
        assert!(QosProfile::decode("::bogus:,:,:,,").is_err());
    }
}
