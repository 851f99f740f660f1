//! Actuator transport
//!
//! Each decision tick ends with one line written to the actuator: `1\n` for
//! focused, `0\n` for not. The transport is any `Write` sink, usually a
//! serial port to the microcontroller driving the feedback hardware.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use focus_types::SerialConfig;
use tracing::info;

/// Wire encoding of one classifier decision.
pub fn encode_decision(focused: bool) -> &'static [u8] {
    if focused {
        b"1\n"
    } else {
        b"0\n"
    }
}

/// Write half of the actuator protocol.
pub struct ActuatorLink {
    sink: Box<dyn Write + Send>,
    port_name: Option<String>,
}

impl ActuatorLink {
    /// Wrap an arbitrary sink.
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink,
            port_name: None,
        }
    }

    /// A link that accepts decisions and throws them away. Used when no
    /// serial transport is configured.
    pub fn discard() -> Self {
        Self::new(Box::new(io::sink()))
    }

    /// Open the configured serial port and wait out the boot settle delay.
    pub fn open_serial(config: &SerialConfig) -> io::Result<Self> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(Duration::from_millis(config.write_timeout_ms))
            .open()?;
        info!(
            "Opened actuator port {} at {} baud",
            config.port, config.baud_rate
        );
        if config.settle_secs > 0.0 {
            // Consumer boards reset when the port opens and drop bytes sent
            // while the firmware is still booting.
            thread::sleep(Duration::from_secs_f32(config.settle_secs));
        }
        Ok(Self {
            sink: Box::new(port),
            port_name: Some(config.port.clone()),
        })
    }

    /// Send one decision. Flushes so the line leaves with the tick that
    /// produced it rather than riding along with a later one.
    pub fn send(&mut self, focused: bool) -> io::Result<()> {
        self.sink.write_all(encode_decision(focused))?;
        self.sink.flush()
    }

    /// Flush and drop the transport.
    pub fn close(mut self) -> io::Result<()> {
        self.sink.flush()?;
        if let Some(name) = &self.port_name {
            info!("Closed actuator port {}", name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl SharedSink {
        fn bytes(&self) -> Vec<u8> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_encoding_is_one_digit_and_newline() {
        assert_eq!(encode_decision(true), b"1\n");
        assert_eq!(encode_decision(false), b"0\n");
    }

    #[test]
    fn test_send_writes_each_decision_in_order() {
        let sink = SharedSink::default();
        let mut link = ActuatorLink::new(Box::new(sink.clone()));

        link.send(true).unwrap();
        link.send(false).unwrap();
        link.send(true).unwrap();
        link.close().unwrap();

        assert_eq!(sink.bytes(), b"1\n0\n1\n");
    }

    #[test]
    fn test_discard_accepts_decisions() {
        let mut link = ActuatorLink::discard();
        link.send(true).unwrap();
        link.send(false).unwrap();
        link.close().unwrap();
    }
}
