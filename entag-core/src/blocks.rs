//! Leitura de blocos de parágrafo: linhas consecutivas acumulam em um bloco,
//! e uma linha em branco (mantida no bloco, com sua quebra) ou o fim da
//! entrada o encerra. Limita a memória ao tamanho de um parágrafo e casa com
//! o contrato por sentença do reconhecedor.

use std::io::{self, BufRead};

/// Lê o próximo bloco de parágrafo para dentro de `block` (substituindo o
/// conteúdo anterior). Retorna `false` quando a entrada terminou sem
/// produzir bloco algum.
///
/// A linha em branco que encerra o bloco faz parte dele: o texto fora dos
/// tokens é reemitido verbatim na renderização, inclusive as quebras.
pub fn read_block<R: BufRead>(reader: &mut R, block: &mut String) -> io::Result<bool> {
    block.clear();
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        block.push_str(&line);
        if line == "\n" || line == "\r\n" {
            break;
        }
    }
    Ok(!block.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(input: &str) -> Vec<String> {
        let mut reader = input.as_bytes();
        let mut block = String::new();
        let mut result = Vec::new();
        while read_block(&mut reader, &mut block).unwrap() {
            result.push(block.clone());
        }
        result
    }

    #[test]
    fn test_single_block() {
        assert_eq!(blocks("uma linha\noutra linha\n"), vec!["uma linha\noutra linha\n"]);
    }

    #[test]
    fn test_blank_line_terminates_and_belongs_to_block() {
        assert_eq!(
            blocks("primeiro\n\nsegundo\n"),
            vec!["primeiro\n\n", "segundo\n"]
        );
    }

    #[test]
    fn test_leading_blank_line_is_its_own_block() {
        assert_eq!(blocks("\ntexto\n"), vec!["\n", "texto\n"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(blocks("").is_empty());
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        let input = "a\nb\n\n\nc";
        assert_eq!(blocks(input).concat(), input);
    }

    #[test]
    fn test_last_line_without_newline() {
        assert_eq!(blocks("sem quebra"), vec!["sem quebra"]);
    }
}
