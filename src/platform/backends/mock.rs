// src/platform/backends/mock.rs

use crate::buffer::OffscreenBuffer;
use crate::platform::backends::{Driver, PlatformEvent};
use anyhow::Result;
use std::collections::VecDeque;

pub const MOCK_WINDOW_ID: u64 = 0x40_0001;
pub const MOCK_DELETE_ATOM: u64 = 301;
pub const MOCK_SPACE_KEYCODE: u32 = 65;

/// A scripted driver: each call to `process_events` drains one queued batch.
pub struct MockDriver {
    batches: VecDeque<Vec<PlatformEvent>>,
    buffer: OffscreenBuffer,
    delete_atom: Option<u64>,
    pub resize_calls: Vec<(u32, u32)>,
    pub presented_frames: usize,
    pub last_presented: Vec<u8>,
    pub cleanup_calls: usize,
}

impl MockDriver {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            batches: VecDeque::new(),
            buffer: OffscreenBuffer::new(width as usize, height as usize)
                .expect("mock buffer allocation"),
            delete_atom: Some(MOCK_DELETE_ATOM),
            resize_calls: Vec::new(),
            presented_frames: 0,
            last_presented: Vec::new(),
            cleanup_calls: 0,
        }
    }

    pub fn without_delete_atom(mut self) -> Self {
        self.delete_atom = None;
        self
    }

    pub fn push_batch(&mut self, events: Vec<PlatformEvent>) {
        self.batches.push_back(events);
    }
}

impl Driver for MockDriver {
    fn process_events(&mut self) -> Result<Vec<PlatformEvent>> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }

    fn window_id(&self) -> u64 {
        MOCK_WINDOW_ID
    }

    fn delete_window_atom(&self) -> Option<u64> {
        self.delete_atom
    }

    fn designated_keycode(&self) -> Option<u32> {
        Some(MOCK_SPACE_KEYCODE)
    }

    fn resize_buffer(&mut self, width: u32, height: u32) -> Result<()> {
        self.resize_calls.push((width, height));
        self.buffer = OffscreenBuffer::new(width as usize, height as usize)?;
        Ok(())
    }

    fn buffer(&self) -> &OffscreenBuffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut OffscreenBuffer {
        &mut self.buffer
    }

    fn present(&mut self) -> Result<()> {
        self.presented_frames += 1;
        self.last_presented = self.buffer.as_bytes().to_vec();
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.cleanup_calls += 1;
        Ok(())
    }
}
