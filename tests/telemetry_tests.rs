//! Telemetry framing and decoding tests

use ecg_heart_monitor::fault::FaultCode;
use ecg_heart_monitor::telemetry::{
    AlarmEdge, Decoded, LowRateAlarm, TelemetryDecoder, TelemetryFrame,
};

#[test]
fn test_plain_frame_is_one_byte() {
    let frame = TelemetryFrame::sample(125);
    assert_eq!(frame.as_bytes(), &[125]);
    assert!(!frame.has_rate());
}

#[test]
fn test_beat_frame_order() {
    let frame = TelemetryFrame::beat(130, 150, 300);
    assert_eq!(frame.as_bytes(), &[130, 150, 44]);
    assert!(frame.has_rate());
}

#[test]
fn test_send_writes_in_order() {
    let mut sent = Vec::new();
    let mut transport = |byte: u8| -> Result<(), FaultCode> {
        sent.push(byte);
        Ok(())
    };

    TelemetryFrame::beat(130, 60, 80).send(&mut transport).unwrap();
    TelemetryFrame::sample(81).send(&mut transport).unwrap();

    assert_eq!(sent, vec![130, 60, 80, 81]);
}

#[test]
fn test_send_stops_at_first_failure() {
    let mut sent = Vec::new();
    let mut transport = |byte: u8| -> Result<(), FaultCode> {
        if sent.len() == 1 {
            return Err(FaultCode::TransportUnavailable);
        }
        sent.push(byte);
        Ok(())
    };

    let result = TelemetryFrame::beat(130, 60, 80).send(&mut transport);

    assert_eq!(result, Err(FaultCode::TransportUnavailable));
    assert_eq!(sent, vec![130]);
}

#[test]
fn test_decoder_splits_rate_from_samples() {
    let mut decoder = TelemetryDecoder::new();
    let decoded: Vec<_> = [50u8, 130, 72, 44, 51]
        .iter()
        .filter_map(|&b| decoder.push(b))
        .collect();

    assert_eq!(
        decoded,
        vec![
            Decoded::Sample(50),
            Decoded::HeartRate(72),
            Decoded::Sample(44),
            Decoded::Sample(51),
        ]
    );
    assert_eq!(decoder.heart_rate(), 72);
}

#[test]
fn test_decoder_marker_then_marker_value() {
    // A BPM byte equal to the marker is consumed as BPM
    let mut decoder = TelemetryDecoder::new();
    assert_eq!(decoder.push(130), None);
    assert!(decoder.is_expecting_rate());
    assert_eq!(decoder.push(130), Some(Decoded::HeartRate(130)));
    assert!(!decoder.is_expecting_rate());
}

#[test]
fn test_decoder_sample_collides_with_marker() {
    // A genuine sample of 130 is read as a marker and swallows the next byte.
    // The link accepts this ambiguity.
    let mut decoder = TelemetryDecoder::new();
    assert_eq!(decoder.push(130), None);
    assert_eq!(decoder.push(60), Some(Decoded::HeartRate(60)));
}

#[test]
fn test_decoder_reads_encoder_output() {
    let mut stream = Vec::new();
    stream.extend_from_slice(TelemetryFrame::sample(60).as_bytes());
    stream.extend_from_slice(TelemetryFrame::beat(130, 75, 320).as_bytes());
    stream.extend_from_slice(TelemetryFrame::sample(125).as_bytes());

    let mut decoder = TelemetryDecoder::new();
    let decoded: Vec<_> = stream.iter().filter_map(|&b| decoder.push(b)).collect();

    assert_eq!(
        decoded,
        vec![
            Decoded::Sample(60),
            Decoded::HeartRate(75),
            Decoded::Sample(64),
            Decoded::Sample(125),
        ]
    );
}

#[test]
fn test_alarm_ignores_zero() {
    let mut alarm = LowRateAlarm::new();
    assert_eq!(alarm.update(0), None);
    assert!(!alarm.is_active());
}

#[test]
fn test_alarm_edges() {
    let mut alarm = LowRateAlarm::new();

    assert_eq!(alarm.update(72), None);
    assert_eq!(alarm.update(29), Some(AlarmEdge::Raised));
    assert!(alarm.is_active());
    assert_eq!(alarm.update(25), None);
    assert_eq!(alarm.update(30), Some(AlarmEdge::Cleared));
    assert!(!alarm.is_active());
}

#[test]
fn test_alarm_clears_on_zero() {
    let mut alarm = LowRateAlarm::new();
    alarm.update(20);
    assert_eq!(alarm.update(0), Some(AlarmEdge::Cleared));
}

#[test]
fn test_alarm_silence() {
    let mut alarm = LowRateAlarm::with_threshold(50);
    alarm.update(40);
    alarm.silence();
    assert!(!alarm.is_active());
    assert_eq!(alarm.update(40), Some(AlarmEdge::Raised));
}
