use supercontrol::backends::virtual_input::create_virtual_devices;
use supercontrol::logger::EventLogger;
use supercontrol::{DeviceManager, EventFilter, GamepadControl, InputConfig, Phase, UnifiedInput};

fn main() {
    env_logger::init();

    let mut input = UnifiedInput::new(&InputConfig::default()).expect("default config");
    // RUST_LOG=supercontrol=trace shows every keyboard event as it arrives.
    input
        .keyboard_mut()
        .bus_mut()
        .subscribe(EventFilter::All, EventLogger::new("keyboard"));

    let (mut pad, mut kbm) = create_virtual_devices();

    // Queued before the manager takes ownership; the first pump drains it.
    pad.connect();
    kbm.key_down(" ");
    let mut manager = DeviceManager::new();
    manager.add_device(pad);
    manager.add_device(kbm);

    for cycle in 0..3 {
        let delivered = manager.pump(&mut input);
        println!("cycle {cycle}: {delivered} event(s)");

        for phase in [Phase::Pressed, Phase::Held, Phase::Released] {
            let ids: Vec<&str> = input
                .view(phase)
                .iter()
                .filter(|(_, on)| *on == Some(true))
                .map(|(id, _)| id)
                .collect();
            println!("  {phase}: {ids:?}");
        }
        println!(
            "  jump: {}",
            input.any_of(
                Phase::Pressed,
                ["KeySpace", GamepadControl::Button0.as_str()]
            )
        );

        input.update();
    }

    println!("{}", input.snapshot().to_json().expect("snapshot json"));
}
