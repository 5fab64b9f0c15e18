//! Interactive menu over a catalog
//!
//! Reads choices and field values from any `BufRead` and renders to any
//! `Write`, so the same loop drives a terminal or a test buffer.

use crate::catalog::{BookDraft, Catalog};
use crate::config::BookshelfConfig;
use crate::error::Result;
use crate::import;
use std::io::{BufRead, Write};
use tracing::{debug, info};

const MENU: &str = "\n0 - Exit\n\
                    1 - Add a new book\n\
                    2 - Search books by genre\n\
                    3 - Import books from CSV\n\
                    4 - Show books\n\
                    5 - Close library\n\n\
                    Option: ";

/// Menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Exit,
    AddBook,
    SearchGenre,
    Import,
    Show,
    CloseLibrary,
}

impl MenuOption {
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim().parse::<u8>().ok()? {
            0 => Some(MenuOption::Exit),
            1 => Some(MenuOption::AddBook),
            2 => Some(MenuOption::SearchGenre),
            3 => Some(MenuOption::Import),
            4 => Some(MenuOption::Show),
            5 => Some(MenuOption::CloseLibrary),
            _ => None,
        }
    }
}

/// Menu loop bound to one catalog, an input and an output
pub struct Shell<R, W> {
    catalog: Catalog,
    config: BookshelfConfig,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(catalog: Catalog, config: BookshelfConfig, input: R, output: W) -> Self {
        Shell {
            catalog,
            config,
            input,
            output,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Give back the catalog
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Run until the user picks Exit or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "{}", MENU)?;
            self.output.flush()?;

            let Some(choice) = self.read_line()? else {
                debug!("Input closed, leaving menu");
                return Ok(());
            };

            match MenuOption::from_choice(&choice) {
                Some(MenuOption::Exit) => return Ok(()),
                Some(MenuOption::AddBook) => self.add_book()?,
                Some(MenuOption::SearchGenre) => self.search_genre()?,
                Some(MenuOption::Import) => self.import_books()?,
                Some(MenuOption::Show) => self.show_books()?,
                Some(MenuOption::CloseLibrary) => self.close_library()?,
                None => writeln!(self.output, "\nInvalid option!")?,
            }
        }
    }

    fn add_book(&mut self) -> Result<()> {
        let Some(title) = self.prompt("Title")? else {
            return Ok(());
        };
        let Some(author) = self.prompt("Author")? else {
            return Ok(());
        };
        let Some(genre) = self.prompt("Genre")? else {
            return Ok(());
        };
        let Some(publisher) = self.prompt("Publisher")? else {
            return Ok(());
        };
        let Some(pages) = self.prompt_number("Pages")? else {
            return Ok(());
        };
        let Some(year) = self.prompt_number("Year")? else {
            return Ok(());
        };

        let draft = BookDraft::new(title, author, genre, publisher, year, pages);
        match self.catalog.insert_draft(draft) {
            Ok(id) => writeln!(self.output, "Book added with id {}.", id)?,
            Err(err) => writeln!(self.output, "Could not add book: {}", err)?,
        }
        Ok(())
    }

    fn search_genre(&mut self) -> Result<()> {
        let Some(genre) = self.prompt("Genre")? else {
            return Ok(());
        };

        let mut found = 0;
        for book in self.catalog.search_by_genre(&genre) {
            writeln!(self.output, "{}", book)?;
            found += 1;
        }
        if found == 0 {
            writeln!(self.output, "No books found for genre '{}'.", genre)?;
        }
        Ok(())
    }

    fn import_books(&mut self) -> Result<()> {
        let Some(path) = self.prompt("CSV file")? else {
            return Ok(());
        };

        match import::bulk_load(&path, &mut self.catalog, self.config.import.schema) {
            Ok(report) => {
                writeln!(
                    self.output,
                    "Imported {} books ({} lines skipped).",
                    report.imported,
                    report.skipped_count()
                )?;
                for skipped in &report.skipped {
                    writeln!(self.output, "  skipped {}", skipped)?;
                }
            }
            Err(err) => writeln!(self.output, "Could not import '{}': {}", path, err)?,
        }
        Ok(())
    }

    fn show_books(&mut self) -> Result<()> {
        if self.catalog.is_empty() {
            writeln!(self.output, "The library is empty.")?;
            return Ok(());
        }
        for book in self.catalog.iter() {
            writeln!(self.output, "{}", book)?;
        }
        Ok(())
    }

    fn close_library(&mut self) -> Result<()> {
        let fresh = Catalog::from_config(&self.config)?;
        let released = std::mem::replace(&mut self.catalog, fresh).destroy();
        info!("Library closed from menu");
        writeln!(self.output, "Library closed, {} books released.", released)?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;
        Ok(self.read_line()?.map(|value| value.trim().to_string()))
    }

    /// Re-prompts until the answer is a non-negative integer
    fn prompt_number(&mut self, label: &str) -> Result<Option<u32>> {
        loop {
            let Some(value) = self.prompt(label)? else {
                return Ok(None);
            };
            match value.parse::<u32>() {
                Ok(number) => return Ok(Some(number)),
                Err(_) => writeln!(self.output, "Please enter a non-negative integer.")?,
            }
        }
    }
}
