use approx::assert_relative_eq;
use sensors::mcp3002::{Channel, Mcp3002, Settings};
use sensors::{Fixed, Float};

mod fake;
use fake::{Delay, Mcp3002Bus};

#[test]
fn converts_every_channel_after_settling() {
    logger::tracing::setup_for_tests();

    let bus = Mcp3002Bus::new([1, 2, 3, 4]);
    let mut adc = Mcp3002::<_, _, Fixed>::with_math(bus, Delay::default());
    let reading = adc.read_data().unwrap();

    assert_eq!(reading.code(Channel::Differential0), 1);
    assert_eq!(reading.code(Channel::Differential1), 2);
    assert_eq!(reading.code(Channel::Single0), 3);
    assert_eq!(reading.code(Channel::Single1), 4);

    let (bus, delay) = adc.release();
    assert_eq!(bus.commands, [0x48, 0x58, 0x68, 0x78]);
    assert_eq!(delay.waits_ms, [100]);
}

#[test]
fn undefined_high_bits_are_masked() {
    let bus = Mcp3002Bus::new([0, 0x3FF, 0x155, 0x2AA]);
    let mut adc = Mcp3002::<_, _, Fixed>::with_math(bus, Delay::default());
    let reading = adc.read_data().unwrap();

    assert_eq!(reading.differential_0, 0);
    assert_eq!(reading.differential_1, 0x3FF);
    assert_eq!(reading.single_0, 0x155);
    assert_eq!(reading.single_1, 0x2AA);
}

#[test]
fn scales_with_reference() {
    let bus = Mcp3002Bus::new([0, 1023, 512, 256]);
    let mut adc = Mcp3002::<_, _, Fixed>::with_math(bus, Delay::default());
    adc.set_settings(Settings { reference: 3300 });
    let reading = adc.read_data().unwrap();

    assert_eq!(adc.compute_voltage(&reading, Channel::Differential0), 0);
    assert_eq!(adc.compute_voltage(&reading, Channel::Differential1), 3296);
    assert_eq!(adc.compute_voltage(&reading, Channel::Single0), 1650);
    assert_eq!(adc.compute_voltage(&reading, Channel::Single1), 825);

    let (bus, delay) = adc.release();
    let mut adc = Mcp3002::<_, _, Float>::with_math(bus, delay);
    adc.set_settings(Settings { reference: 3.3 });
    let reading = adc.read_data().unwrap();
    assert_relative_eq!(
        adc.compute_voltage(&reading, Channel::Single0),
        1.65,
        epsilon = 1e-12
    );
}

#[test]
fn default_reference_is_zero() {
    let bus = Mcp3002Bus::new([1023; 4]);
    let mut adc = Mcp3002::<_, _, Fixed>::with_math(bus, Delay::default());
    let reading = adc.read_data().unwrap();
    assert_eq!(adc.compute_voltage(&reading, Channel::Single1), 0);
}
