//! Destinations for rendered report blocks

use std::io::{self, Write};

/// Receives each rendered report block as it is produced.
pub trait OutputSink {
    fn display(&mut self, text: &str) -> io::Result<()>;
}

impl<S> OutputSink for &mut S
where
    S: OutputSink + ?Sized,
{
    fn display(&mut self, text: &str) -> io::Result<()> {
        (**self).display(text)
    }
}

/// Writes each block followed by a newline, flushing after every block.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W> WriterSink<W>
where
    W: Write,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputSink for WriterSink<W>
where
    W: Write,
{
    fn display(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{text}")?;
        self.writer.flush()
    }
}

/// Keeps every block in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySink {
    blocks: Vec<String>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    #[must_use]
    pub fn into_blocks(self) -> Vec<String> {
        self.blocks
    }
}

impl OutputSink for MemorySink {
    fn display(&mut self, text: &str) -> io::Result<()> {
        self.blocks.push(text.to_owned());
        Ok(())
    }
}

/// Drops every block.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl OutputSink for DiscardSink {
    fn display(&mut self, _text: &str) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_sink_appends_newline() {
        let mut sink = WriterSink::new(Vec::new());
        sink.display("a\nb").unwrap();
        sink.display("c").unwrap();
        assert_eq!(sink.into_inner(), b"a\nb\nc\n");
    }

    #[test]
    fn test_memory_sink_through_reference() {
        fn emit(mut sink: impl OutputSink, text: &str) {
            sink.display(text).unwrap();
        }

        let mut sink = MemorySink::new();
        emit(&mut sink, "first");
        emit(DiscardSink, "dropped");
        emit(&mut sink, "second");
        assert_eq!(sink.blocks(), ["first", "second"]);
    }
}
