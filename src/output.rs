//! Match output in MUMmer's text format or as JSON lines

use crate::matches::Match;
use crate::seq::MultiSeq;
use serde::Serialize;
use std::io;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Formatting switches
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Print the reference name even for a single-record reference
    pub four_column: bool,
    /// Append `Len = n` to strand headers
    pub show_lengths: bool,
    /// Print the matched string below each match
    pub show_string: bool,
    /// Report reverse-strand query positions on the forward strand
    pub forward_positions: bool,
    pub json: bool,
}

/// One query strand whose matches are printed together
#[derive(Debug, Clone, Copy)]
pub struct Strand<'a> {
    pub name: &'a str,
    pub len: usize,
    pub reverse: bool,
}

#[derive(Serialize)]
struct JsonMatch<'a> {
    query: &'a str,
    reverse: bool,
    reference: &'a str,
    ref_pos: usize,
    query_pos: usize,
    length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    string: Option<&'a str>,
}

pub struct Printer<'r, W> {
    out: W,
    options: OutputOptions,
    reference: &'r MultiSeq,
}

impl<'r> Printer<'r, StandardStream> {
    /// Print to stdout, coloured when `color` is set and stdout is a terminal
    pub fn stdout(reference: &'r MultiSeq, options: OutputOptions, color: bool) -> Self {
        let choice = if color && io::IsTerminal::is_terminal(&io::stdout()) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice), reference, options)
    }
}

impl<'r, W: WriteColor> Printer<'r, W> {
    pub fn new(out: W, reference: &'r MultiSeq, options: OutputOptions) -> Self {
        Self {
            out,
            options,
            reference,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the header of `strand` followed by its matches
    pub fn print_strand(&mut self, strand: Strand<'_>, matches: &[Match]) -> io::Result<()> {
        if self.options.json {
            for m in matches {
                self.print_json(strand, m)?;
            }
            return self.out.flush();
        }

        self.print_header(strand)?;
        for m in matches {
            self.print_match(strand, m)?;
        }
        self.out.flush()
    }

    fn print_header(&mut self, strand: Strand<'_>) -> io::Result<()> {
        self.out
            .set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        write!(self.out, "> {}", strand.name)?;
        if strand.reverse {
            write!(self.out, " Reverse")?;
        }
        if self.options.show_lengths {
            write!(self.out, "  Len = {}", strand.len)?;
        }
        self.out.reset()?;
        writeln!(self.out)
    }

    fn print_match(&mut self, strand: Strand<'_>, m: &Match) -> io::Result<()> {
        let Some((record, ref_pos)) = self.position(m) else {
            return Ok(());
        };
        let query_pos = self.query_position(strand, m);

        if self.show_names() {
            self.out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(self.out, "  {}", self.reference.records()[record].name)?;
            self.out.reset()?;
            write!(self.out, " ")?;
        }
        writeln!(self.out, "{:8}  {:8}  {:8}", ref_pos, query_pos, m.length)?;

        if self.options.show_string {
            let string = &self.reference.text()[m.ref_start..m.ref_start + m.length];
            self.out.write_all(string)?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn print_json(&mut self, strand: Strand<'_>, m: &Match) -> io::Result<()> {
        let Some((record, ref_pos)) = self.position(m) else {
            return Ok(());
        };
        let string = self
            .options
            .show_string
            .then(|| std::str::from_utf8(&self.reference.text()[m.ref_start..m.ref_start + m.length]).ok())
            .flatten();
        let line = JsonMatch {
            query: strand.name,
            reverse: strand.reverse,
            reference: &self.reference.records()[record].name,
            ref_pos,
            query_pos: self.query_position(strand, m),
            length: m.length,
            string,
        };
        serde_json::to_writer(&mut self.out, &line)?;
        writeln!(self.out)
    }

    fn show_names(&self) -> bool {
        self.options.four_column || self.reference.len() > 1
    }

    /// Record and 1-based position within it of the match start
    fn position(&self, m: &Match) -> Option<(usize, usize)> {
        let located = self.reference.locate(m.ref_start);
        debug_assert!(located.is_some(), "match starts on a separator");
        located.map(|(record, offset)| (record, offset + 1))
    }

    fn query_position(&self, strand: Strand<'_>, m: &Match) -> usize {
        if strand.reverse && self.options.forward_positions {
            strand.len - m.query_start
        } else {
            m.query_start + 1
        }
    }
}

/// Print tree statistics for the `stats` command
/// Print the tree report; `depths` adds the branch node count per depth
pub fn print_stats(
    name: &str,
    reference: &MultiSeq,
    stats: &crate::stree::TreeStats,
    depths: Option<&[u64]>,
) {
    println!("Suffix Tree Statistics");
    println!("======================");
    println!();
    println!("Reference:        {}", name);
    println!("Records:          {}", reference.len());
    println!("Text length:      {}", stats.text_len);
    println!("Leaves:           {}", stats.leaves);
    println!("Branch nodes:     {}", stats.branches);
    println!("  small:          {}", stats.small_nodes);
    println!("  large:          {}", stats.large_nodes);
    println!("Max depth:        {}", stats.max_depth);
    println!("Table words:      {}", stats.table_words);
    println!("Table growths:    {}", stats.growths);
    println!("Memory:           {}", format_size(stats.memory_bytes()));
    if stats.text_len > 0 {
        println!(
            "Bytes per symbol: {:.2}",
            stats.memory_bytes() as f64 / stats.text_len as f64
        );
    }
    if let Some(depths) = depths {
        println!();
        println!("Branch depths:");
        for (depth, &count) in depths.iter().enumerate().filter(|&(_, &count)| count > 0) {
            println!("  {:<16}{}", format!("depth {depth}:"), count);
        }
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
