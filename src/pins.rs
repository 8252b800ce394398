use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;

/// Failure to parse a `P<port>_<pin>` identity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinNameError {
    /// The token does not split into exactly two `_`-separated fields.
    Fields(String),
    /// A field is not a decimal integer.
    Integer(String),
}

impl fmt::Display for PinNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinNameError::Fields(token) => write!(f, "pin name {token:?} is not P<port>_<pin>"),
            PinNameError::Integer(token) => write!(f, "pin name {token:?} has a non-numeric field"),
        }
    }
}

impl Error for PinNameError {}

/// Parses a `P<port>_<pin>` identity token as found in the `ALT0` column.
pub fn parse_pin_name(token: &str) -> Result<(u32, u32), PinNameError> {
    let body = token.strip_prefix('P').unwrap_or(token);
    let Some((port, pin)) = body.split_once('_') else {
        return Err(PinNameError::Fields(token.to_string()));
    };
    if pin.contains('_') {
        return Err(PinNameError::Fields(token.to_string()));
    }
    let port = port
        .parse()
        .map_err(|_| PinNameError::Integer(token.to_string()))?;
    let pin = pin
        .parse()
        .map_err(|_| PinNameError::Integer(token.to_string()))?;
    Ok((port, pin))
}

// Pin indices stay below 100 on every supported part.
pub fn sort_key(port: u32, pin: u32) -> u32 {
    port * 100 + pin
}

static PIO_NAME: OnceLock<Regex> = OnceLock::new();

/// Extracts `(port, pin)` from a pad name of the form `PIO<port>_<pin>/...`.
/// Returns `None` unless the name contains exactly one such fragment, which
/// filters out supply pads and other non-GPIO entries.
pub fn find_pio_name(name: &str) -> Option<(u32, u32)> {
    let re = PIO_NAME.get_or_init(|| Regex::new(r"PIO(\d+)_(\d+)/").unwrap());
    let mut matches = re.captures_iter(name);
    let cap = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    let port = cap[1].parse().ok()?;
    let pin = cap[2].parse().ok()?;
    Some((port, pin))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRecord {
    pub port: u32,
    pub pin: u32,
    /// Supported mux indices, ascending, duplicate-free.
    pub alt: Vec<u32>,
}

/// All pins of one port, ascending by pin index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortGroup {
    pub port: u32,
    pub pins: Vec<PinRecord>,
}

/// Normalized pin table. Keyed by `(port, pin)`; a re-inserted pin replaces
/// the earlier record. Traversal is always ascending by port, then pin.
#[derive(Debug, Default)]
pub struct PinTable {
    pins: BTreeMap<(u32, u32), Vec<u32>>,
}

impl PinTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rec: PinRecord) {
        if rec.alt.is_empty() {
            log::warn!(
                "discarding P{}_{}: no alternate functions",
                rec.port,
                rec.pin
            );
            return;
        }
        self.pins.insert((rec.port, rec.pin), rec.alt);
    }

    pub fn ports(&self) -> Vec<PortGroup> {
        let mut res = vec![];
        let groups = self.pins.iter().chunk_by(|&(&(port, _), _)| port);
        for (port, pins) in &groups {
            res.push(PortGroup {
                port,
                pins: pins
                    .map(|(&(_, pin), alt)| PinRecord {
                        port,
                        pin,
                        alt: alt.clone(),
                    })
                    .collect(),
            });
        }
        res
    }
}

#[test]
fn test_parse_pin_name() {
    use assert_matches::assert_matches;
    assert_eq!(parse_pin_name("P1_5"), Ok((1, 5)));
    assert_eq!(parse_pin_name("P0_31"), Ok((0, 31)));
    assert_eq!(parse_pin_name("P4_0"), Ok((4, 0)));
    assert_matches!(parse_pin_name("P1"), Err(PinNameError::Fields(_)));
    assert_matches!(parse_pin_name("P1_2_3"), Err(PinNameError::Fields(_)));
    assert_matches!(parse_pin_name("PA_3"), Err(PinNameError::Integer(_)));
    assert_matches!(parse_pin_name("P1_"), Err(PinNameError::Integer(_)));
    assert_matches!(parse_pin_name("LPUART0"), Err(PinNameError::Fields(_)));
}

#[test]
fn test_sort_key() {
    for port in 0..6 {
        for pin in 0..32 {
            assert_eq!(sort_key(port, pin), port * 100 + pin);
        }
    }
    assert!(sort_key(1, 0) > sort_key(0, 31));
}

#[test]
fn test_find_pio_name() {
    assert_eq!(find_pio_name("PIO1_8/FC4_P0/CT_INP8"), Some((1, 8)));
    assert_eq!(find_pio_name("PIO0_2/"), Some((0, 2)));
    assert_eq!(find_pio_name("PIOA_3/SOMETHING"), None);
    assert_eq!(find_pio_name("VDD"), None);
    assert_eq!(find_pio_name("PIO1_8"), None);
    assert_eq!(find_pio_name("PIO1_8/X/PIO2_9/Y"), None);
}

#[test]
fn test_pin_table() {
    let mut table = PinTable::new();
    table.insert(PinRecord {
        port: 2,
        pin: 3,
        alt: vec![0],
    });
    table.insert(PinRecord {
        port: 0,
        pin: 7,
        alt: vec![0, 1],
    });
    table.insert(PinRecord {
        port: 0,
        pin: 2,
        alt: vec![2],
    });
    table.insert(PinRecord {
        port: 0,
        pin: 7,
        alt: vec![5],
    });
    table.insert(PinRecord {
        port: 1,
        pin: 0,
        alt: vec![],
    });
    let ports = table.ports();
    assert_eq!(ports.len(), 2);
    assert_eq!(ports[0].port, 0);
    assert_eq!(
        ports[0].pins,
        vec![
            PinRecord {
                port: 0,
                pin: 2,
                alt: vec![2],
            },
            PinRecord {
                port: 0,
                pin: 7,
                alt: vec![5],
            },
        ]
    );
    assert_eq!(ports[1].port, 2);
    assert_eq!(ports[1].pins.len(), 1);
}
