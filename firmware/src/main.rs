// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Thermovalve node firmware for the Nucleo-F767ZI.
//!
//! | Peripheral | Pins | Use |
//! | ---------- | ---- | --- |
//! | USART3 | PD8 / PD9 (ST-LINK) | Debug log |
//! | USART6 | PG14 TX / PG9 RX | Command link |
//! | I2C1 | PB8 SCL / PB9 SDA | BMP280 |
//! | CAN1 | PD1 TX / PD0 RX | Stepper driver |

#![no_main]
#![no_std]

use core::cell::RefCell;
use core::fmt::{Debug, Write};

use cortex_m::delay::Delay;
use cortex_m_rt::entry;
use critical_section::Mutex;
use panic_halt as _;

use hal::{
    can::Can,
    i2c::{BlockingI2c, Mode},
    pac::{self, interrupt},
    prelude::*,
    serial::{Config, Event, Rx, Serial},
};
use stm32f7xx_hal as hal;

use thermovalve::drivers::{Bmp280, StepperCan};
use thermovalve::protocol::{LineAssembler, Mailbox};
use thermovalve::{ControlNode, CycleReport};

mod config;
mod hw;
use hw::{CanBus, I2cRegisters, Usart};

/// Completed command lines, posted by the USART6 interrupt.
static MAILBOX: Mailbox = Mailbox::new();

/// Receive half of the command link, moved here once the port is configured.
static CMD_RX: Mutex<RefCell<Option<Rx<pac::USART6>>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks (16 MHz HSI)
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    // GPIO
    let gpiob = dp.GPIOB.split();
    let gpiod = dp.GPIOD.split();
    let gpiog = dp.GPIOG.split();

    // USART3 (DBG)
    let tx = gpiod.pd8.into_alternate::<7>();
    let rx = gpiod.pd9.into_alternate::<7>();
    let dbg_cfg = Config {
        baud_rate: config::DEBUG_BAUD.bps(),
        ..Default::default()
    };
    let mut log = Usart::new(Serial::new(dp.USART3, (tx, rx), &clocks, dbg_cfg));
    let _ = writeln!(log, "thermovalve: boot\r");

    // USART6 (command link), RXNE interrupt feeds the line assembler
    let tx = gpiog.pg14.into_alternate::<8>();
    let rx = gpiog.pg9.into_alternate::<8>();
    let cmd_cfg = Config {
        baud_rate: config::CMD_BAUD.bps(),
        ..Default::default()
    };
    let mut cmd_serial = Serial::new(dp.USART6, (tx, rx), &clocks, cmd_cfg);
    cmd_serial.listen(Event::Rxne);
    let (mut cmd_tx, cmd_rx) = Usart::split(cmd_serial);
    critical_section::with(|cs| CMD_RX.borrow(cs).replace(Some(cmd_rx)));

    // I2C1 -> BMP280
    let scl = gpiob.pb8.into_alternate_open_drain::<4>();
    let sda = gpiob.pb9.into_alternate_open_drain::<4>();
    let i2c = BlockingI2c::i2c1(
        dp.I2C1,
        (scl, sda),
        Mode::standard(config::I2C_FREQ_HZ.Hz()),
        &clocks,
        &mut rcc.apb1,
        10_000,
    );
    let mut baro_bus = I2cRegisters::new(i2c, config::BMP280_ADDR);

    // SysTick delay
    let mut delay = Delay::new(cp.SYST, clocks.sysclk().raw());

    let baro = loop {
        match Bmp280::new(&mut baro_bus) {
            Ok((dev, info)) => {
                let _ = writeln!(
                    log,
                    "bmp280: id {:#04x} ctrl_meas {:#04x}\r",
                    info.chip_id, info.ctrl_meas_readback
                );
                if !info.chip_id_ok() {
                    let _ = writeln!(log, "bmp280: unexpected chip id, continuing\r");
                }
                break dev;
            }
            Err(e) => {
                let _ = writeln!(log, "bmp280: init failed: {:?}\r", e);
                delay.delay_ms(config::SENSOR_RETRY_MS);
            }
        }
    };

    // CAN1 -> stepper driver
    let can_tx = gpiod.pd1.into_alternate::<9>();
    let can_rx = gpiod.pd0.into_alternate::<9>();
    let can = Can::new(dp.CAN1, &mut rcc.apb1, (can_tx, can_rx));
    let mut stepper = StepperCan::new(CanBus::new(can, config::CAN_BTR, false));
    stepper.set_base_id(config::STEPPER_BASE);
    if let Err(e) = stepper.init() {
        let _ = writeln!(log, "can: start failed: {:?}\r", e);
    }
    let _ = writeln!(
        log,
        "stepper: base {:#04x}\r",
        config::STEPPER_BASE.raw()
    );

    let mut node = ControlNode::new(baro, stepper);

    unsafe {
        cortex_m::peripheral::NVIC::unmask(pac::Interrupt::USART6);
    }
    log.flush();

    let mut sensor_ok = true;
    loop {
        let report = node.cycle(&MAILBOX, &mut cmd_tx);
        log_cycle(&mut log, &report, &mut sensor_ok);
        delay.delay_ms(config::LOOP_PERIOD_MS);
    }
}

/// Report what changed this cycle. Sensor errors are logged on transitions only.
fn log_cycle<W: Write, SE: Debug, FE: Debug>(
    log: &mut W,
    report: &CycleReport<SE, FE>,
    sensor_ok: &mut bool,
) {
    match (&report.refresh, *sensor_ok) {
        (Err(e), true) => {
            let _ = writeln!(log, "bmp280: read failed: {:?}\r", e);
            *sensor_ok = false;
        }
        (Ok(_), false) => {
            let _ = writeln!(log, "bmp280: recovered\r");
            *sensor_ok = true;
        }
        _ => {}
    }

    match &report.control {
        Ok(Some(angle)) => {
            let _ = writeln!(log, "valve: {} deg\r", angle);
        }
        Ok(None) => {}
        Err(e) => {
            let _ = writeln!(log, "valve: send failed: {:?}\r", e);
        }
    }

    if let Some(cmd) = report.command {
        let _ = writeln!(log, "cmd: {:?}\r", cmd);
    }
}

#[interrupt]
fn USART6() {
    static mut ASSEMBLER: LineAssembler = LineAssembler::new();

    critical_section::with(|cs| {
        if let Some(rx) = CMD_RX.borrow(cs).borrow_mut().as_mut() {
            // Drain everything that arrived; framing and overrun errors are cleared by the read
            while let Ok(byte) = rx.read() {
                ASSEMBLER.on_byte(byte, &MAILBOX);
            }
        }
    });
}
