use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};

/// An in-memory sink for `show`, readable while the interpreter holds a
/// clone of it.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    contents: Rc<RefCell<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        SharedBuffer::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.contents.borrow()).into_owned()
    }

    pub fn clear(&self) {
        self.contents.borrow_mut().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.contents.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
