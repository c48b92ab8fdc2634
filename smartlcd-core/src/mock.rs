//! Recording doubles for the bus, the plotter and the delay

use std::collections::VecDeque;
use std::string::{String, ToString};
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use smartlcd_protocol::PixelType;

use crate::bus::ParallelBus;
use crate::traits::{BackgroundTask, DiagnosticsSource, Plotter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    Command(u8),
    Data(u8),
    ReadStatus,
    ReadData { flushed: bool },
}

/// Bus that records every cycle and answers reads from queues
#[derive(Default)]
pub struct MockBus {
    pub ops: Vec<BusOp>,
    pub status: u8,
    pub ram: VecDeque<u8>,
}

impl MockBus {
    pub fn commands(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                BusOp::Command(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn data(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                BusOp::Data(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

impl ParallelBus for MockBus {
    fn write_command(&mut self, code: u8) {
        self.ops.push(BusOp::Command(code));
    }

    fn write_data(&mut self, byte: u8) {
        self.ops.push(BusOp::Data(byte));
    }

    fn read_status(&mut self) -> u8 {
        self.ops.push(BusOp::ReadStatus);
        self.status
    }

    fn read_data(&mut self, flush_stale: bool) -> u8 {
        self.ops.push(BusOp::ReadData {
            flushed: flush_stale,
        });
        self.ram.pop_front().unwrap_or(0)
    }
}

/// Delay that only records the requested time
#[derive(Default)]
pub struct NoDelay {
    pub total_ns: u64,
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Pixel(u8, u8, PixelType),
    Line(u8, u8, u8, u8, PixelType),
    Rect(u8, u8, u8, u8, PixelType),
    FilledRect(u8, u8, u8, u8, PixelType),
    Circle(u8, u8, u8, PixelType),
    FilledCircle(u8, u8, u8, PixelType),
    Text(String, u8, u8),
    Page(Vec<u8>, u8, u8),
    Clear,
    CacheClear,
}

/// Plotter that records every primitive
#[derive(Default)]
pub struct RecordingPlotter {
    pub ops: Vec<DrawOp>,
}

impl RecordingPlotter {
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(text, _, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn pages(&self) -> Vec<(&[u8], u8, u8)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Page(data, page, column) => Some((data.as_slice(), *page, *column)),
                _ => None,
            })
            .collect()
    }
}

impl Plotter for RecordingPlotter {
    fn draw_pixel(&mut self, x: u8, y: u8, pixel: PixelType) {
        self.ops.push(DrawOp::Pixel(x, y, pixel));
    }

    fn draw_line(&mut self, x1: u8, y1: u8, x2: u8, y2: u8, pixel: PixelType) {
        self.ops.push(DrawOp::Line(x1, y1, x2, y2, pixel));
    }

    fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8, pixel: PixelType) {
        self.ops.push(DrawOp::Rect(x, y, width, height, pixel));
    }

    fn draw_filled_rect(&mut self, x: u8, y: u8, width: u8, height: u8, pixel: PixelType) {
        self.ops.push(DrawOp::FilledRect(x, y, width, height, pixel));
    }

    fn draw_circle(&mut self, x: u8, y: u8, radius: u8, pixel: PixelType) {
        self.ops.push(DrawOp::Circle(x, y, radius, pixel));
    }

    fn draw_filled_circle(&mut self, x: u8, y: u8, radius: u8, pixel: PixelType) {
        self.ops.push(DrawOp::FilledCircle(x, y, radius, pixel));
    }

    fn draw_string(&mut self, text: &str, x: u8, y: u8) {
        self.ops.push(DrawOp::Text(text.to_string(), x, y));
    }

    fn put_page(&mut self, data: &[u8], page: u8, column: u8) {
        self.ops.push(DrawOp::Page(data.to_vec(), page, column));
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn cache_clear(&mut self) {
        self.ops.push(DrawOp::CacheClear);
    }
}

/// Background task counting its invocations
#[derive(Default)]
pub struct CountingTask {
    pub runs: usize,
}

impl BackgroundTask for CountingTask {
    fn run(&mut self) {
        self.runs += 1;
    }
}

/// Fixed sensor values
#[derive(Default, Clone, Copy)]
pub struct Sensors {
    pub temperature: f32,
    pub light: f32,
    pub buttons: u8,
}

impl DiagnosticsSource for Sensors {
    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn light(&self) -> f32 {
        self.light
    }

    fn buttons(&self) -> u8 {
        self.buttons
    }
}
