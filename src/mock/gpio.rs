//! Mock GPIO lines

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::error::GpioError;
use crate::hal::gpio::{InputPin, OutputPin};

/// Input line whose level the test scripts.
#[derive(Debug, Clone)]
pub struct MockInputPin {
    level: Rc<Cell<bool>>,
}

impl MockInputPin {
    pub fn new(high: bool) -> Self {
        Self {
            level: Rc::new(Cell::new(high)),
        }
    }

    /// Set the raw level (for simulating button presses and bounce).
    pub fn set_level(&self, high: bool) {
        self.level.set(high);
    }
}

impl InputPin for MockInputPin {
    fn is_high(&self) -> bool {
        self.level.get()
    }
}

#[derive(Debug, Default)]
struct OutputInner {
    level: bool,
    history: Vec<bool>,
    fail: bool,
}

/// Output line recording every level written.
#[derive(Debug, Clone, Default)]
pub struct MockOutputPin {
    inner: Rc<RefCell<OutputInner>>,
}

impl MockOutputPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last level successfully written.
    pub fn level(&self) -> bool {
        self.inner.borrow().level
    }

    /// Every level written, in order.
    pub fn history(&self) -> Vec<bool> {
        self.inner.borrow().history.clone()
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail(&self, fail: bool) {
        self.inner.borrow_mut().fail = fail;
    }
}

impl OutputPin for MockOutputPin {
    fn set_level(&mut self, high: bool) -> Result<(), GpioError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail {
            return Err(GpioError::WriteFailed);
        }
        inner.level = high;
        inner.history.push(high);
        Ok(())
    }
}
