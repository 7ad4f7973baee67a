//! 结构化记录解析
//!
//! 只接受一个扁平对象 `{ 'key': 'value', "key": "value", ... }`：
//! 键和值都必须是带引号的字符串（单引号或双引号均可），允许末尾逗号，
//! 允许外层包一层 markdown 代码块。其他任何形式都直接拒绝，不做求值。

use regex::Regex;

use crate::error::DecodeError;
use crate::models::QuestionRecord;

/// 去掉 LLM 经常附带的 ``` 代码块外壳
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Ok(re) = Regex::new(r"(?s)^```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)\r?\n?```$") {
        if let Some(body) = re.captures(trimmed).and_then(|cap| cap.get(1)) {
            return body.as_str();
        }
    }
    trimmed
}

/// 将 LLM 的整理结果解析为题目记录
pub fn decode_record(text: &str) -> Result<QuestionRecord, DecodeError> {
    let body = strip_code_fence(text);
    LiteralParser::new(body).parse_record()
}

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralParser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn parse_record(mut self) -> Result<QuestionRecord, DecodeError> {
        let mut record = QuestionRecord::new();

        self.skip_whitespace();
        self.expect('{')?;
        self.skip_whitespace();

        if self.peek() == Some('}') {
            self.pos += 1;
            self.expect_end()?;
            return Err(DecodeError::EmptyRecord);
        }

        loop {
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.parse_string()?;

            if record.contains_key(&key) {
                return Err(DecodeError::DuplicateKey(key));
            }
            record.insert(key, value);

            self.skip_whitespace();
            match self.next() {
                Some(',') => {
                    self.skip_whitespace();
                    if self.peek() == Some('}') {
                        self.pos += 1;
                        break;
                    }
                }
                Some('}') => break,
                Some(c) => return Err(self.error_at(self.pos - 1, format!("意外的字符 '{}'", c))),
                None => return Err(self.error("对象没有闭合")),
            }
        }

        self.expect_end()?;
        Ok(record)
    }

    fn parse_string(&mut self) -> Result<String, DecodeError> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            Some(c) => return Err(self.error(format!("需要带引号的字符串，得到 '{}'", c))),
            None => return Err(self.error("需要带引号的字符串，但文本已结束")),
        };
        self.pos += 1;

        let mut out = String::new();
        loop {
            match self.next() {
                None => return Err(self.error("字符串没有闭合")),
                Some(c) if c == quote => return Ok(out),
                Some('\n') | Some('\r') => {
                    return Err(self.error_at(self.pos - 1, "字符串中不允许出现换行"))
                }
                Some('\\') => self.parse_escape(&mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), DecodeError> {
        match self.next() {
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('/') => out.push('/'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let first = self.parse_hex4()?;
                let c = if (0xD800..0xDC00).contains(&first) {
                    // 高位代理项必须紧跟低位代理项
                    if self.next() != Some('\\') || self.next() != Some('u') {
                        return Err(self.error("缺少低位代理项"));
                    }
                    let second = self.parse_hex4()?;
                    if !(0xDC00..0xE000).contains(&second) {
                        return Err(self.error("无效的低位代理项"));
                    }
                    char::from_u32(0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00))
                } else {
                    char::from_u32(first)
                };
                out.push(c.ok_or_else(|| self.error("无效的 unicode 转义"))?);
            }
            Some(c) => return Err(self.error_at(self.pos - 1, format!("不支持的转义 '\\{}'", c))),
            None => return Err(self.error("转义序列没有结束")),
        }
        Ok(())
    }

    fn parse_hex4(&mut self) -> Result<u32, DecodeError> {
        let mut value = 0u32;
        for _ in 0..4 {
            let digit = self
                .next()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("无效的 \\u 转义"))?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    fn expect(&mut self, expected: char) -> Result<(), DecodeError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("需要 '{}'，得到 '{}'", expected, c))),
            None => Err(self.error(format!("需要 '{}'，但文本已结束", expected))),
        }
    }

    fn expect_end(&mut self) -> Result<(), DecodeError> {
        self.skip_whitespace();
        if self.pos < self.chars.len() {
            return Err(self.error("对象之后还有多余内容"));
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, reason: impl Into<String>) -> DecodeError {
        self.error_at(self.pos, reason)
    }

    fn error_at(&self, position: usize, reason: impl Into<String>) -> DecodeError {
        DecodeError::Malformed {
            position,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_single_quoted_literal() {
        let record = decode_record("{'question':'Q1 text'}").unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.question(), Some("Q1 text"));
    }

    #[test]
    fn test_decode_full_question() {
        let text = r#"{'question': "Which of the following is true about merge sort's space usage?",
 'a': 'It sorts in place.',
 'b': 'It needs O(n) auxiliary space.',
 'c': 'It needs O(log n) auxiliary space.',
 'd': 'It needs O(n^2) auxiliary space.',
}"#;
        let record = decode_record(text).unwrap();
        assert_eq!(record.len(), 5);
        assert_eq!(
            record.question(),
            Some("Which of the following is true about merge sort's space usage?")
        );
        assert_eq!(record.get("b"), Some("It needs O(n) auxiliary space."));
        assert!(!record.contains_key("answer"));
    }

    #[test]
    fn test_decode_json_object_in_code_fence() {
        let text = "```json\n{\"question\": \"Q\\u00e9\", \"a\": \"x\\ny\"}\n```";
        let record = decode_record(text).unwrap();
        assert_eq!(record.question(), Some("Qé"));
        assert_eq!(record.get("a"), Some("x\ny"));
    }

    #[test]
    fn test_decode_escapes() {
        let record = decode_record(r#"{'question': 'it\'s \"quoted\" \\ 😀'}"#).unwrap();
        assert_eq!(record.question(), Some("it's \"quoted\" \\ 😀"));
    }

    #[test]
    fn test_rejects_plain_text() {
        assert!(matches!(
            decode_record("oops"),
            Err(DecodeError::Malformed { position: 0, .. })
        ));
        assert!(decode_record("").is_err());
    }

    #[test]
    fn test_rejects_non_string_values() {
        assert!(decode_record("{'question': 42}").is_err());
        assert!(decode_record("{'options': ['a', 'b']}").is_err());
        assert!(decode_record("{question: 'bare key'}").is_err());
        assert!(decode_record("{'question': __import__('os')}").is_err());
    }

    #[test]
    fn test_rejects_trailing_or_leading_prose() {
        assert!(decode_record("Sure! {'question': 'Q'}").is_err());
        assert!(decode_record("{'question': 'Q'} Hope this helps").is_err());
        assert!(decode_record("{'question': 'Q'").is_err());
        assert!(decode_record("{'question': 'Q' 'a': 'b'}").is_err());
    }

    #[test]
    fn test_rejects_empty_and_duplicate() {
        assert_eq!(decode_record("{}"), Err(DecodeError::EmptyRecord));
        assert_eq!(decode_record("  { }  "), Err(DecodeError::EmptyRecord));
        assert_eq!(
            decode_record("{'a': 'x', 'a': 'y'}"),
            Err(DecodeError::DuplicateKey("a".to_string()))
        );
    }

    #[test]
    fn test_rejects_raw_newline_and_unknown_escape() {
        assert!(decode_record("{'question': 'line one\nline two'}").is_err());
        assert!(decode_record(r"{'question': '\x41'}").is_err());
        assert!(decode_record(r"{'question': '\ud83d'}").is_err());
    }
}
