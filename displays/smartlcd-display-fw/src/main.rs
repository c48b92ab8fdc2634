//! Smart-LCD Display Firmware
//!
//! Firmware for the Smart-LCD 240x128 UC1608 panel on an STM32F072.
//! Drawing commands arrive over USART2; staged facts and the animation
//! self-test are rendered by the display task, which owns the controller.

#![no_std]
#![no_main]

mod board;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::adc::{self, Adc, SampleTime};
use embassy_stm32::exti::{self, ExtiInput};
use embassy_stm32::gpio::{Flex, Input, Level, Output, OutputType, Pull, Speed};
use embassy_stm32::mode::Async;
use embassy_stm32::peripherals::{ADC1, PA1, USART2};
use embassy_stm32::time::khz;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::usart::{self, Uart};
use embassy_stm32::{bind_interrupts, Peri};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration, Ticker, Timer};
use {defmt_rtt as _, panic_probe as _};

use smartlcd_core::config::{AnimationConfig, ControllerConfig, LayoutConfig};
use smartlcd_core::traits::{BackgroundTask, Clock, Plotter};
use smartlcd_core::{
    run_test_pattern, AnimationFlag, AnimationSession, BacklightTask, CommandSlot,
    FieldRenderer, Interpreter, LcdBus, LightSensorCell, StagedStore, Step, SubmitError, Uc1608,
};
use smartlcd_display::FrameBuffer;
use smartlcd_hal::InputPin;
use smartlcd_hal_stm32f0::{ButtonPin, ControlPin, FlexDataPort, UartBusError, UartConfig};
use smartlcd_protocol::{FrameParser, Opcode};

use crate::board::{temperature_from_adc, BoardSensors, PwmBacklight, Readings, Uptime};

bind_interrupts!(struct Irqs {
    USART2 => usart::InterruptHandler<USART2>;
    ADC1_COMP => adc::InterruptHandler<ADC1>;
    EXTI0_1 => exti::InterruptHandler<embassy_stm32::interrupt::typelevel::EXTI0_1>;
});

type Lcd = Uc1608<
    LcdBus<ControlPin<'static>, ControlPin<'static>, ControlPin<'static>, FlexDataPort<'static>>,
    Delay,
>;

/// Facts written by producers, drained by the renderer
static STAGED: StagedStore = StagedStore::new();

/// Remote command waiting for the interpreter
static COMMAND_SLOT: CommandSlot = CommandSlot::new();

/// Animation session enable, cleared to cancel
static ANIMATION: AnimationFlag = AnimationFlag::new();

static LIGHT: LightSensorCell = LightSensorCell::new();

static READINGS: Readings = Readings::new();

/// Self-test bitmask requested by the test button
static TEST_PATTERN: Signal<CriticalSectionRawMutex, u8> = Signal::new();

/// Executed opcode to acknowledge on the command channel
static COMMAND_ACK: Signal<CriticalSectionRawMutex, u8> = Signal::new();

/// Display loop period
const FRAME_MS: u64 = 5;

/// Sensor sampling period
const SENSOR_MS: u64 = 100;

/// Controller bring-up attempts before giving up
const INIT_ATTEMPTS: u8 = 3;

/// Every self-test pattern, including the animation session
const FULL_TEST: u8 = 0xFF;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Smart-LCD Display Firmware starting...");

    let p = embassy_stm32::init(Default::default());

    // Control lines PB0=CD, PB1=RW, PB2=EN
    let cd = ControlPin::new(Output::new(p.PB0, Level::Low, Speed::High));
    let rw = ControlPin::new(Output::new(p.PB1, Level::Low, Speed::High));
    let en = ControlPin::new(Output::new(p.PB2, Level::Low, Speed::High));

    // Data bus PC0..PC7
    let data = FlexDataPort::new([
        Flex::new(p.PC0),
        Flex::new(p.PC1),
        Flex::new(p.PC2),
        Flex::new(p.PC3),
        Flex::new(p.PC4),
        Flex::new(p.PC5),
        Flex::new(p.PC6),
        Flex::new(p.PC7),
    ]);

    let bus = LcdBus::new(cd, rw, en, data);
    let lcd = Uc1608::new(bus, Delay, ControllerConfig::default());

    // Backlight PWM on PA6 (TIM3 CH1)
    let pwm = SimplePwm::new(
        p.TIM3,
        Some(PwmPin::new(p.PA6, OutputType::PushPull)),
        None,
        None,
        None,
        khz(1),
        Default::default(),
    );
    let backlight = PwmBacklight::new(pwm);

    // Command channel PA3=RX, PA2=TX
    let uart = Uart::new(
        p.USART2,
        p.PA3, // RX
        p.PA2, // TX
        Irqs,
        p.DMA1_CH4,
        p.DMA1_CH5,
        UartConfig::default().to_usart(),
    )
    .unwrap();
    let (tx, rx) = uart.split();

    // Light sensor on PA1, diagnostic buttons on PB8/PB9, test button on PA0
    let adc = Adc::new(p.ADC1, Irqs);
    let buttons = [
        ButtonPin::new(Input::new(p.PB8, Pull::Up)),
        ButtonPin::new(Input::new(p.PB9, Pull::Up)),
    ];
    let test_button = ExtiInput::new(p.PA0, p.EXTI0, Pull::Down, Irqs);

    // Spawn tasks
    spawner.spawn(uart_rx_task(rx)).unwrap();
    spawner.spawn(uart_tx_task(tx)).unwrap();
    spawner.spawn(sensor_task(adc, p.PA1, buttons)).unwrap();
    spawner.spawn(clock_task()).unwrap();
    spawner.spawn(test_button_task(test_button)).unwrap();
    spawner.spawn(display_task(lcd, backlight)).unwrap();

    info!("All tasks spawned");
}

/// UART receive task - frames bytes into the command slot
#[embassy_executor::task]
async fn uart_rx_task(mut rx: usart::UartRx<'static, Async>) {
    info!("UART RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; 1];

    loop {
        if let Err(e) = rx.read(&mut buf).await {
            let e = UartBusError::from(e);
            warn!("UART read error: {:?}", e);
            if e.breaks_frame() {
                parser.reset();
            }
            Timer::after(Duration::from_millis(10)).await;
            continue;
        }

        let frame = match parser.feed(buf[0]) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(e) => {
                warn!("Dropped frame: {:?}", e);
                continue;
            }
        };

        // Depth-1 slot: hold the line until the interpreter takes the last one
        loop {
            match COMMAND_SLOT.submit(frame.opcode, &frame.payload) {
                Ok(()) => {
                    trace!("Queued opcode {=u8:#x}", frame.opcode);
                    break;
                }
                Err(SubmitError::Busy) => Timer::after(Duration::from_millis(1)).await,
                Err(e) => {
                    warn!("Rejected frame: {:?}", e);
                    break;
                }
            }
        }
    }
}

/// UART transmit task - acknowledges executed commands
#[embassy_executor::task]
async fn uart_tx_task(mut tx: usart::UartTx<'static, Async>) {
    info!("UART TX task started");

    loop {
        let opcode = COMMAND_ACK.wait().await;
        if let Err(e) = tx.write(&[opcode]).await {
            warn!("UART write error: {:?}", UartBusError::from(e));
        }
    }
}

/// Sensor task - light, temperature and button sampling
#[embassy_executor::task]
async fn sensor_task(
    mut adc: Adc<'static, ADC1>,
    mut ldr: Peri<'static, PA1>,
    buttons: [ButtonPin<'static>; 2],
) {
    info!("Sensor task started");

    adc.set_sample_time(SampleTime::CYCLES239_5);
    let mut temperature = adc.enable_temperature();
    let mut ticker = Ticker::every(Duration::from_millis(SENSOR_MS));

    loop {
        let light = adc.read(&mut ldr).await;
        LIGHT.record(light);

        let raw = adc.read(&mut temperature).await;
        READINGS.set_temperature(temperature_from_adc(raw));

        let mask = buttons
            .iter()
            .enumerate()
            .filter(|(_, button)| button.is_low())
            .fold(0u8, |mask, (bit, _)| mask | (1 << bit));
        READINGS.set_buttons(mask);

        ticker.next().await;
    }
}

/// Clock task - publishes uptime as the time-of-day fact
#[embassy_executor::task]
async fn clock_task() {
    let mut ticker = Ticker::every(Duration::from_secs(1));

    loop {
        let secs = embassy_time::Instant::now().as_secs();
        let hour = ((secs / 3600) % 24) as u8;
        let minute = ((secs / 60) % 60) as u8;
        let second = (secs % 60) as u8;
        STAGED.set_time(hour, minute, second);
        ticker.next().await;
    }
}

/// Test button task - starts or cancels the self-test
#[embassy_executor::task]
async fn test_button_task(mut button: ExtiInput<'static>) {
    info!("Test button task started");

    loop {
        button.wait_for_rising_edge().await;
        // Debounce
        Timer::after(Duration::from_millis(20)).await;
        if button.is_low() {
            continue;
        }

        if ANIMATION.is_set() {
            debug!("Self-test cancelled");
            ANIMATION.clear();
        } else {
            debug!("Self-test requested");
            TEST_PATTERN.signal(FULL_TEST);
        }

        button.wait_for_falling_edge().await;
        Timer::after(Duration::from_millis(50)).await;
    }
}

/// Display task - sole owner of the controller and the frame buffer
#[embassy_executor::task]
async fn display_task(mut lcd: Lcd, backlight: PwmBacklight) {
    info!("Display task started");

    let mut attempt = 0;
    loop {
        attempt += 1;
        match lcd.initialize() {
            Ok(()) => break,
            Err(e) if attempt < INIT_ATTEMPTS => {
                warn!("Controller init attempt {} failed: {:?}", attempt, e);
                Timer::after(Duration::from_millis(100)).await;
            }
            Err(e) => {
                error!("Controller init failed: {:?}", e);
                lcd.shutdown();
                return;
            }
        }
    }
    info!("UC1608 initialized");

    let mut frame = FrameBuffer::new();
    let mut renderer = FieldRenderer::new(LayoutConfig::default());
    let mut interpreter = Interpreter::new();
    let mut session = AnimationSession::new(AnimationConfig::default());
    let mut backlight = BacklightTask::new(&LIGHT, backlight);
    let sensors = BoardSensors {
        readings: &READINGS,
        light: &LIGHT,
    };
    let mut clock = Uptime::starting_now();
    let mut ticker = Ticker::every(Duration::from_millis(FRAME_MS));

    loop {
        if let Some(mask) = TEST_PATTERN.try_take() {
            // Session time counts from its own start
            clock = Uptime::starting_now();
            if let Err(e) = run_test_pattern(mask, &mut lcd, &mut frame, &mut session, &ANIMATION) {
                warn!("Test pattern failed: {:?}", e);
            }
        }

        if session.is_running() {
            let step = session.step(clock.now(), &ANIMATION, &mut frame, &mut backlight, &sensors);
            if step == Step::Finished {
                debug!("Animation finished");
                frame.clear();
                STAGED.invalidate_all();
            }
        } else {
            match interpreter.poll_remote_command(&COMMAND_SLOT, &mut lcd, &mut frame) {
                Ok(0) => {}
                Ok(opcode) => {
                    trace!("Executed opcode {=u8:#x}", opcode);
                    if Opcode::from_u8(opcode).is_some_and(Opcode::clears_screen) {
                        STAGED.invalidate_all();
                    }
                    COMMAND_ACK.signal(opcode);
                }
                Err(e) => warn!("Remote command failed: {:?}", e),
            }

            let code = renderer.poll_render(&STAGED, &mut frame);
            if code != 0 {
                trace!("Rendered fact {}", code);
            }

            backlight.run();
        }

        if let Err(e) = frame.flush(&mut lcd) {
            warn!("Flush failed: {:?}", e);
        }

        ticker.next().await;
    }
}
