use supercontrol::{DeviceManager, InputConfig, Phase, Stick, UnifiedInput};

fn main() {
    env_logger::init();

    let mut manager = DeviceManager::discover();
    println!("Devices:");
    for id in manager.device_ids() {
        println!("- {id}");
    }

    let mut input = UnifiedInput::new(&InputConfig::default()).expect("default config");
    let mut previous = input.snapshot();
    loop {
        manager.pump(&mut input);
        input.update();

        let snapshot = input.snapshot();
        for id in snapshot.changed_since(&previous) {
            if snapshot.is(Phase::Pressed, id) {
                println!("{id} pressed, left stick {:?}", input.gamepad().stick(Stick::Left));
            }
        }
        previous = snapshot;

        // Sleep a touch to avoid pegging the CPU in the demo
        std::thread::sleep(std::time::Duration::from_millis(16));
    }
}
