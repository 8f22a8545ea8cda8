use std::net::UdpSocket;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use aerotrack::telemetry::decode_angle;
use aerotrack::vision::SyntheticPairSource;
use aerotrack::{run_sender, RunLimits, SenderConfig};

fn receiver() -> UdpSocket {
    let sock = UdpSocket::bind("127.0.0.1:0").expect("bind");
    sock.set_read_timeout(Some(Duration::from_millis(200)))
        .expect("timeout");
    sock
}

fn drain(sock: &UdpSocket) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let mut buf = [0u8; 64];
    while let Ok((n, _)) = sock.recv_from(&mut buf) {
        out.push(buf[..n].to_vec());
    }
    out
}

#[test]
fn level_bar_streams_all_zero_datagrams() {
    let rx = receiver();
    let config = SenderConfig {
        destination: rx.local_addr().unwrap(),
        ..SenderConfig::default()
    };
    let mut source = SyntheticPairSource::new(320, 240, vec![0.0; 30]);
    let running = AtomicBool::new(true);

    let report = run_sender(&config, &mut source, RunLimits::default(), &running).unwrap();
    assert_eq!(report.vision.processed, 30);
    assert_eq!(report.pipeline.fresh, 30);
    assert_eq!(report.final_angle, 0.0);

    for datagram in drain(&rx) {
        assert_eq!(datagram, vec![0u8; 8]);
    }
}

#[test]
fn tilted_bar_converges_and_is_published() {
    let rx = receiver();
    let config = SenderConfig {
        destination: rx.local_addr().unwrap(),
        ..SenderConfig::default()
    };
    let tilt = 0.3;
    let mut source = SyntheticPairSource::new(640, 480, vec![tilt; 90]);
    let running = AtomicBool::new(true);

    let report = run_sender(&config, &mut source, RunLimits::default(), &running).unwrap();
    assert!(
        (report.final_angle - tilt).abs() < 0.02,
        "final angle {}",
        report.final_angle
    );

    let received = drain(&rx);
    assert!(received.len() as u64 <= report.publisher.sent);
    for datagram in &received {
        assert_eq!(datagram.len(), 8);
        let angle = decode_angle(datagram).unwrap();
        assert!((0.0..=tilt + 0.03).contains(&angle), "angle {angle}");
    }
}

#[test]
fn frame_budget_ends_an_endless_run() {
    let rx = receiver();
    let config = SenderConfig {
        destination: rx.local_addr().unwrap(),
        ..SenderConfig::default()
    };
    let mut source = SyntheticPairSource::new(160, 120, vec![0.1, 0.2]).repeating();
    let running = AtomicBool::new(true);

    let report = run_sender(
        &config,
        &mut source,
        RunLimits {
            max_frames: Some(12),
        },
        &running,
    )
    .unwrap();
    assert_eq!(report.vision.processed, 12);
}
