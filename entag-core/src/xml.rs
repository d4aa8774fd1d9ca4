//! Sink XML: codifica os eventos de marcação como elementos `<sentence>`,
//! `<token>` e `<ne type="...">`, com escape de texto e de atributo.

use std::io::{self, Write};

use crate::entity::EntityCategory;
use crate::render::MarkupSink;

/// Escreve a marcação XML em um `Write` qualquer (stdout, arquivo, buffer).
pub struct XmlSink<W: Write> {
    out: W,
}

impl<W: Write> XmlSink<W> {
    pub fn new(out: W) -> Self {
        XmlSink { out }
    }

    /// Descarrega o writer subjacente (chamado ao fim de cada bloco).
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MarkupSink for XmlSink<W> {
    fn text(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{}", html_escape::encode_text(text))
    }

    fn sentence_open(&mut self) -> io::Result<()> {
        write!(self.out, "<sentence>")
    }

    fn sentence_close(&mut self) -> io::Result<()> {
        write!(self.out, "</sentence>")
    }

    fn entity_open(&mut self, category: EntityCategory) -> io::Result<()> {
        write!(
            self.out,
            "<ne type=\"{}\">",
            html_escape::encode_double_quoted_attribute(category.name())
        )
    }

    fn entity_close(&mut self) -> io::Result<()> {
        write!(self.out, "</ne>")
    }

    fn token(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "<token>{}</token>", html_escape::encode_text(text))
    }
}
