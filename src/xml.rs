use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use simple_error::bail;

use crate::pins::{PinRecord, find_pio_name};

// Only the parts of the pinout descriptor the extractor cares about; every
// other attribute and element is ignored.
#[derive(Debug, Deserialize)]
struct PinoutDoc {
    #[serde(default)]
    pins: Pins,
}

#[derive(Debug, Default, Deserialize)]
struct Pins {
    #[serde(rename = "pin", default)]
    pins: Vec<PinElem>,
}

#[derive(Debug, Deserialize)]
struct PinElem {
    name: String,
    #[serde(rename = "connections", default)]
    connections: Vec<Connection>,
}

#[derive(Debug, Deserialize)]
struct Connection {
    // Read lazily: only inspected for pads that pass the PIO name filter.
    package_function: Option<String>,
}

/// Extracts pin records from XML pinout descriptor source. Pads whose `name`
/// does not look like a PIO pad are skipped (logged at warn level); a bad
/// `package_function` on a PIO pad is an error.
pub fn parse_pinout(xml: &str) -> Result<Vec<PinRecord>, Box<dyn Error>> {
    let doc: PinoutDoc = serde_xml_rs::from_str(xml)?;
    let mut records = vec![];
    for pin in &doc.pins.pins {
        let Some((port, pin_id)) = find_pio_name(&pin.name) else {
            log::warn!("skipping pad {:?}: not a PIO pin", pin.name);
            continue;
        };
        let mut alt = BTreeSet::new();
        for conn in &pin.connections {
            let Some(func) = &conn.package_function else {
                bail!("pin {:?}: connection without package_function", pin.name);
            };
            let idx: u32 = match func.strip_prefix("alt").and_then(|s| s.parse().ok()) {
                Some(idx) => idx,
                None => bail!("pin {:?}: unexpected package_function {func:?}", pin.name),
            };
            alt.insert(idx);
        }
        records.push(PinRecord {
            port,
            pin: pin_id,
            alt: alt.into_iter().collect(),
        });
    }
    Ok(records)
}

pub fn load_pinout(path: &Path) -> Result<Vec<PinRecord>, Box<dyn Error>> {
    let xml = fs::read_to_string(path)?;
    parse_pinout(&xml)
}

#[test]
fn test_parse_pinout() {
    let xml = r#"
<part name="MCXN947VDF">
  <pins>
    <pin name="PIO0_2/FC0_P2/CT_INP2" coords="A3">
      <connections package_function="alt0"/>
      <connections package_function="alt2"/>
      <connections package_function="alt2"/>
    </pin>
    <pin name="VDD_CORE" coords="B1"/>
    <pin name="PIOA_3/SOMETHING" coords="B2"/>
    <pin name="PIO1_10/CT_INP10" coords="C4">
      <connections package_function="alt4"/>
      <connections package_function="alt1"/>
    </pin>
  </pins>
</part>"#;
    let records = parse_pinout(xml).unwrap();
    assert_eq!(
        records,
        vec![
            PinRecord {
                port: 0,
                pin: 2,
                alt: vec![0, 2],
            },
            PinRecord {
                port: 1,
                pin: 10,
                alt: vec![1, 4],
            },
        ]
    );
}

#[test]
fn test_parse_pinout_no_pins() {
    let records = parse_pinout(r#"<part name="MCXN947VDF"></part>"#).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_parse_pinout_bad_function() {
    let xml = r#"
<part>
  <pins>
    <pin name="PIO0_0/X">
      <connections package_function="gpio"/>
    </pin>
  </pins>
</part>"#;
    assert!(parse_pinout(xml).is_err());
}

#[test]
fn test_parse_pinout_bad_function_on_skipped_pad() {
    // non-PIO pads are filtered before their connections are looked at
    let xml = r#"
<part>
  <pins>
    <pin name="VREFN">
      <connections package_function="supply"/>
    </pin>
  </pins>
</part>"#;
    assert!(parse_pinout(xml).unwrap().is_empty());
}

#[test]
fn test_parse_pinout_malformed() {
    assert!(parse_pinout("<part><pins>").is_err());
}
