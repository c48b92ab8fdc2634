//! UART settings for the remote command channel

use embassy_stm32::usart::Error as UsartError;

/// UART configuration
#[derive(Debug, Clone, Copy)]
pub struct UartConfig {
    /// Baud rate (8N1)
    pub baudrate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baudrate: 9600 }
    }
}

impl UartConfig {
    /// Translate into the embassy driver configuration
    pub fn to_usart(&self) -> embassy_stm32::usart::Config {
        let mut config = embassy_stm32::usart::Config::default();
        config.baudrate = self.baudrate;
        config
    }
}

/// Receive or transmit fault on the command channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    Framing,
    Noise,
    Parity,
    /// A received byte was overwritten before it was read
    Overrun,
    Other,
}

impl UartBusError {
    /// Whether a received byte may have been lost or corrupted, so any
    /// partially received frame must be dropped
    pub fn breaks_frame(&self) -> bool {
        !matches!(self, UartBusError::Other)
    }
}

impl From<UsartError> for UartBusError {
    fn from(e: UsartError) -> Self {
        match e {
            UsartError::Framing => Self::Framing,
            UsartError::Noise => Self::Noise,
            UsartError::Parity => Self::Parity,
            UsartError::Overrun => Self::Overrun,
            _ => Self::Other,
        }
    }
}
