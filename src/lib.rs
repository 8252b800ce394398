//! Pin-mux table extraction for MCX-family HALs.
//!
//! Turns vendor pin-description data (an `ALT0..ALT11` spreadsheet or an XML
//! pinout descriptor) into `gpio!`/`lpuart!` declaration blocks ready to be
//! pasted into the HAL sources. See the `extract_sheet_pins` and
//! `extract_xml_pins` tools.

pub mod emit;
pub mod pins;
pub mod sheet;
pub mod xml;
