use clap::Parser;
use jetblack_hud::{
    open_panel, Args, HudController, Panel, Runner, SimulatedVehicle, VirtualPanel,
};
use log::{info, warn};
use std::sync::atomic::Ordering;

fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .init();

    info!("JetBlack HUD starting...");

    let runner = Runner::new(args.tick_period()).with_duration(args.duration());
    let running = runner.stop_flag();
    if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
        warn!("Ctrl-C handler not installed: {}", e);
    }
    let vehicle = SimulatedVehicle::new();

    if args.simulate {
        info!("using the virtual IO box");
        let panel = Panel::connect(VirtualPanel::new(), args.panel_config());
        let mut hud = HudController::new(panel, vehicle, args.hud_config());

        let mut shown = (String::new(), String::new(), 0u8);
        runner.run(&mut hud, |hud, dt_ms| {
            hud.vehicle_mut().advance(u64::from(dt_ms));

            let Some(device) = hud.panel_mut().transport_mut() else {
                return;
            };
            device.advance(dt_ms);

            let lcd = device.lcd();
            let current = (lcd.line(0).to_owned(), lcd.line(1).to_owned(), device.backlight());
            if current != shown {
                info!("LCD |{}|{}| backlight {:03b}", current.0, current.1, current.2);
                shown = current;
            }
        });
    } else {
        let panel = open_panel(&args.port_settings(), args.panel_config());
        let mut hud = HudController::new(panel, vehicle, args.hud_config());

        runner.run(&mut hud, |hud, dt_ms| {
            hud.vehicle_mut().advance(u64::from(dt_ms));
        });
    }
}
