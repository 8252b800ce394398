use std::fmt::Write;

use itertools::Itertools;

use crate::pins::PortGroup;

/// Electrical mode every generated pin starts out in.
const DEFAULT_MODE: &str = "Input<Floating>";

/// Renders one `gpio!` block per port. The text is pasted verbatim into the
/// HAL's gpio module, so the layout here is load-bearing.
pub fn gpio_blocks(ports: &[PortGroup]) -> String {
    let mut buf = String::new();
    for group in ports {
        writeln!(buf, "gpio!({0}, {0}, [", group.port).unwrap();
        for pin in &group.pins {
            writeln!(
                buf,
                "    {}: [{}], {DEFAULT_MODE}",
                pin.pin,
                pin.alt.iter().join(", ")
            )
            .unwrap();
        }
        writeln!(buf, "]);").unwrap();
    }
    buf
}

/// Peripheral instance table. Only the `lpuart!` header is generated for
/// now; the per-instance rx/tx pin routing still has to be filled in by
/// hand, so there is no closing marker yet.
pub fn lpuart_block() -> String {
    let mut buf = String::new();
    writeln!(buf, "lpuart!(").unwrap();
    writeln!(buf, "    [LPUART0]").unwrap();
    buf
}

#[cfg(test)]
use crate::pins::PinRecord;

#[test]
fn test_gpio_blocks() {
    let ports = vec![PortGroup {
        port: 1,
        pins: vec![PinRecord {
            port: 1,
            pin: 5,
            alt: vec![0, 3, 7],
        }],
    }];
    assert_eq!(
        gpio_blocks(&ports),
        "gpio!(1, 1, [\n    5: [0, 3, 7], Input<Floating>\n]);\n"
    );
}

#[test]
fn test_gpio_blocks_contiguous() {
    let ports = vec![
        PortGroup {
            port: 0,
            pins: vec![PinRecord {
                port: 0,
                pin: 0,
                alt: vec![0],
            }],
        },
        PortGroup {
            port: 2,
            pins: vec![
                PinRecord {
                    port: 2,
                    pin: 1,
                    alt: vec![0, 11],
                },
                PinRecord {
                    port: 2,
                    pin: 9,
                    alt: vec![5],
                },
            ],
        },
    ];
    assert_eq!(
        gpio_blocks(&ports),
        "gpio!(0, 0, [\n\
         \x20   0: [0], Input<Floating>\n\
         ]);\n\
         gpio!(2, 2, [\n\
         \x20   1: [0, 11], Input<Floating>\n\
         \x20   9: [5], Input<Floating>\n\
         ]);\n"
    );
}

#[test]
fn test_lpuart_block() {
    assert_eq!(lpuart_block(), "lpuart!(\n    [LPUART0]\n");
}

// End to end: descriptor text in, declaration text out, and running it twice
// gives identical output.
#[test]
fn test_pinout_to_text() {
    use crate::pins::PinTable;
    let xml = r#"
<part>
  <pins>
    <pin name="PIO1_9/FC4_P1">
      <connections package_function="alt1"/>
      <connections package_function="alt2"/>
    </pin>
    <pin name="PIO0_31/CT_INP15">
      <connections package_function="alt0"/>
    </pin>
    <pin name="VSS"/>
  </pins>
</part>"#;
    let render = || {
        let mut table = PinTable::new();
        for rec in crate::xml::parse_pinout(xml).unwrap() {
            table.insert(rec);
        }
        gpio_blocks(&table.ports())
    };
    let text = render();
    assert_eq!(
        text,
        "gpio!(0, 0, [\n\
         \x20   31: [0], Input<Floating>\n\
         ]);\n\
         gpio!(1, 1, [\n\
         \x20   9: [1, 2], Input<Floating>\n\
         ]);\n"
    );
    assert_eq!(text, render());
}
