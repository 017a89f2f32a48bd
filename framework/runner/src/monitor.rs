use parley_core::prelude::DelegatedStopListener;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Monitor the resource usage of the harness process and report high usage.
///
/// A load generator that is itself CPU-starved produces misleading latency numbers, so warn the
/// user when the harness is using a noticeable share of the machine. This never stops the test.
pub(crate) fn start_monitor(mut stop_listener: DelegatedStopListener) {
    let spawned = std::thread::Builder::new()
        .name("monitor".to_string())
        .spawn(move || {
            let this_process_pid = Pid::from_u32(std::process::id());
            let mut sys = System::new();

            sys.refresh_cpu_usage();
            let cpu_count = sys.cpus().len().max(1);

            loop {
                if stop_listener.should_stop() {
                    break;
                }

                sys.refresh_processes_specifics(
                    ProcessesToUpdate::Some(&[this_process_pid]),
                    true,
                    ProcessRefreshKind::nothing().with_cpu(),
                );

                if let Some(process) = sys.process(this_process_pid) {
                    let usage = (process.cpu_usage() / (cpu_count * 100) as f32) * 100.0;
                    if usage > 10.0 {
                        log::warn!(
                            "High CPU usage detected. The harness is using {:.2}% of the CPU, with {} available cores. Latency numbers may be skewed.",
                            usage,
                            cpu_count
                        );
                    }
                }

                std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
            }
        });

    if let Err(e) = spawned {
        log::warn!("Failed to start resource monitor thread: {e}");
    }
}
