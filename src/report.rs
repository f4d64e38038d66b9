//! Output of polled states: tracing lines or JSON on stdout

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use xinput_joystick::config::{OutputConfig, OutputFormat};
use xinput_joystick::input::gamepad::{Axis, JoystickState, RawGamepad};

/// JSON line written when raw readings are requested
#[derive(Serialize)]
struct RawAndState<'a> {
    raw: &'a RawGamepad,
    state: &'a JoystickState,
}

/// Tracks what was last reported so unchanged polls can be skipped
pub struct Reporter {
    format: OutputFormat,
    only_changes: bool,
    include_raw: bool,
    last_packet: Option<u32>,
    connected: Option<bool>,
}

impl Reporter {
    pub fn new(output: &OutputConfig, include_raw: bool) -> Self {
        Self {
            format: output.format,
            only_changes: output.only_changes,
            include_raw,
            last_packet: None,
            connected: None,
        }
    }

    /// Apply reloaded output settings
    pub fn update(&mut self, output: &OutputConfig) {
        self.format = output.format;
        self.only_changes = output.only_changes;
    }

    /// Log a connect transition (once per change)
    pub fn connected(&mut self, name: &str) {
        if self.connected != Some(true) {
            info!("✅ {} connected", name);
            self.connected = Some(true);
        }
    }

    /// Log a disconnect transition (once per change)
    pub fn disconnected(&mut self, name: &str) {
        if self.connected != Some(false) {
            warn!("{} is not connected", name);
            self.connected = Some(false);
            // Report the first state after reconnecting even if the packet matches
            self.last_packet = None;
        }
    }

    /// Whether a poll with this packet number should be reported
    fn should_emit(&mut self, packet_number: u32) -> bool {
        if self.only_changes && self.last_packet == Some(packet_number) {
            return false;
        }
        self.last_packet = Some(packet_number);
        true
    }

    /// Report one poll; returns the rendered line, or `None` if it was skipped
    pub fn emit(&mut self, raw: &RawGamepad, state: &JoystickState) -> Result<Option<String>> {
        if !self.should_emit(raw.packet_number) {
            return Ok(None);
        }

        let line = self.render(raw, state)?;
        match self.format {
            OutputFormat::Json => println!("{}", line),
            OutputFormat::Log => info!("{}", line),
        }

        Ok(Some(line))
    }

    fn render(&self, raw: &RawGamepad, state: &JoystickState) -> Result<String> {
        match self.format {
            OutputFormat::Json if self.include_raw => Ok(serde_json::to_string(&RawAndState { raw, state })?),
            OutputFormat::Json => Ok(serde_json::to_string(state)?),
            OutputFormat::Log => {
                let axes = Axis::ALL
                    .iter()
                    .map(|axis| format!("{}={}", axis.short_name(), state.axis(*axis)))
                    .collect::<Vec<_>>()
                    .join(" ");
                let buttons = state
                    .pressed_buttons()
                    .map(|b| b.name())
                    .collect::<Vec<_>>()
                    .join(",");

                let mut line = format!("{} buttons=[{}]", axes, buttons);
                if self.include_raw {
                    line.push_str(&format!(
                        " raw(lx={} ly={} rx={} ry={} lt={} rt={} btn={:#06x})",
                        raw.thumb_lx,
                        raw.thumb_ly,
                        raw.thumb_rx,
                        raw.thumb_ry,
                        raw.left_trigger,
                        raw.right_trigger,
                        raw.buttons
                    ));
                }
                Ok(line)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xinput_joystick::input::gamepad::{Button, DeadzoneProfile};

    fn output(format: OutputFormat, only_changes: bool) -> OutputConfig {
        OutputConfig { format, only_changes }
    }

    fn sample(packet_number: u32) -> (RawGamepad, JoystickState) {
        let raw = RawGamepad {
            packet_number,
            buttons: Button::A.mask() | Button::DPadLeft.mask(),
            left_trigger: 255,
            right_trigger: 0,
            thumb_lx: 32767,
            thumb_ly: 0,
            thumb_rx: 0,
            thumb_ry: -32767,
        };
        let state = DeadzoneProfile::XINPUT.normalize(&raw);
        (raw, state)
    }

    #[test]
    fn test_log_line() {
        let mut reporter = Reporter::new(&output(OutputFormat::Log, true), false);
        let (raw, state) = sample(1);
        let line = reporter.emit(&raw, &state).unwrap().unwrap();
        assert_eq!(
            line,
            "lx=32767 ly=0 rx=0 ry=-32767 zl=255 zr=0 buttons=[dpad.left,a]"
        );
    }

    #[test]
    fn test_json_line() {
        let mut reporter = Reporter::new(&output(OutputFormat::Json, true), false);
        let (raw, state) = sample(1);
        let line = reporter.emit(&raw, &state).unwrap().unwrap();
        assert_eq!(line, r#"{"buttons":4100,"axes":[32767,0,0,-32767,255,0]}"#);
    }

    #[test]
    fn test_json_line_with_raw() {
        let mut reporter = Reporter::new(&output(OutputFormat::Json, true), true);
        let (raw, state) = sample(3);
        let line = reporter.emit(&raw, &state).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["raw"]["packet_number"], 3);
        assert_eq!(value["state"]["axes"][0], 32767);
    }

    #[test]
    fn test_skips_unchanged_packets() {
        let mut reporter = Reporter::new(&output(OutputFormat::Log, true), false);
        let (raw, state) = sample(5);
        assert!(reporter.emit(&raw, &state).unwrap().is_some());
        assert!(reporter.emit(&raw, &state).unwrap().is_none());

        let (raw, state) = sample(6);
        assert!(reporter.emit(&raw, &state).unwrap().is_some());
    }

    #[test]
    fn test_reports_every_poll_when_configured() {
        let mut reporter = Reporter::new(&output(OutputFormat::Log, false), false);
        let (raw, state) = sample(5);
        assert!(reporter.emit(&raw, &state).unwrap().is_some());
        assert!(reporter.emit(&raw, &state).unwrap().is_some());
    }

    #[test]
    fn test_reconnect_reports_same_packet() {
        let mut reporter = Reporter::new(&output(OutputFormat::Log, true), false);
        let (raw, state) = sample(5);
        reporter.connected("pad");
        assert!(reporter.emit(&raw, &state).unwrap().is_some());
        reporter.disconnected("pad");
        reporter.connected("pad");
        assert!(reporter.emit(&raw, &state).unwrap().is_some());
    }
}
