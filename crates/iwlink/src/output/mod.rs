//! Output formatting (JSON/text) for command replies.

mod interface;

use std::io::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Pretty print (for JSON).
    pub pretty: bool,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output.
    #[default]
    Text,
    /// JSON output, one object per line.
    Json,
}

/// Trait for types that can be printed.
pub trait Printable {
    /// Print as plain text.
    fn print_text<W: Write + ?Sized>(&self, w: &mut W, opts: &OutputOptions)
    -> std::io::Result<()>;

    /// Convert to JSON value.
    fn to_json(&self) -> serde_json::Value;

    /// Print in the specified format.
    fn print<W: Write + ?Sized>(
        &self,
        w: &mut W,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> std::io::Result<()> {
        match format {
            OutputFormat::Text => self.print_text(w, opts),
            OutputFormat::Json => {
                let json = self.to_json();
                if opts.pretty {
                    serde_json::to_writer_pretty(&mut *w, &json)?;
                } else {
                    serde_json::to_writer(&mut *w, &json)?;
                }
                writeln!(w)?;
                Ok(())
            }
        }
    }
}

/// Destination for reply output, fixed to one format for the invocation.
pub struct Printer<'w> {
    out: &'w mut dyn Write,
    format: OutputFormat,
    opts: OutputOptions,
}

impl<'w> Printer<'w> {
    pub fn new(out: &'w mut dyn Write, format: OutputFormat, opts: OutputOptions) -> Self {
        Self { out, format, opts }
    }

    /// Plain text printer with default options.
    pub fn text(out: &'w mut dyn Write) -> Self {
        Self::new(out, OutputFormat::Text, OutputOptions::default())
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print one item.
    pub fn print<T: Printable>(&mut self, item: &T) -> std::io::Result<()> {
        item.print(&mut *self.out, self.format, &self.opts)
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}
