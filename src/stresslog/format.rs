// Mon Jan 26 2026 - Alex

//! printf-style rendering of stress-log messages whose arguments are raw 64-bit values.

#[derive(Debug, Default, Clone, Copy)]
struct Directive {
    left_align: bool,
    zero_pad: bool,
    alternate: bool,
    width: usize,
    wide: bool,
    narrow: bool,
}

/// Substitutes `args` into `format` in order.
///
/// Supports `%d %i %u %x %X %p %s %c %%` with width, `-`, `0` and `#` flags and
/// the `h hh l ll z I64 I32` length modifiers. Arguments are truncated to 32
/// bits unless a wide modifier is present. A specifier without a matching
/// argument is copied through unchanged.
pub fn render(format: &str, args: &[u64]) -> String {
    let mut out = String::with_capacity(format.len() + args.len() * 8);
    let mut args = args.iter().copied();
    let mut chars = format.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut directive = Directive::default();
        while let Some(&(_, flag)) = chars.peek() {
            match flag {
                '-' => directive.left_align = true,
                '0' => directive.zero_pad = true,
                '#' => directive.alternate = true,
                '+' | ' ' => {}
                _ => break,
            }
            chars.next();
        }
        while let Some(&(_, digit)) = chars.peek() {
            match digit.to_digit(10) {
                Some(d) => {
                    directive.width = directive.width * 10 + d as usize;
                    chars.next();
                }
                None => break,
            }
        }
        if let Some(&(_, '.')) = chars.peek() {
            chars.next();
            while matches!(chars.peek(), Some(&(_, d)) if d.is_ascii_digit()) {
                chars.next();
            }
        }
        loop {
            match chars.peek() {
                Some(&(_, 'l')) | Some(&(_, 'z')) | Some(&(_, 'j')) | Some(&(_, 't')) => {
                    directive.wide = true;
                    chars.next();
                }
                Some(&(_, 'h')) => {
                    directive.narrow = true;
                    chars.next();
                }
                Some(&(idx, 'I')) => {
                    let rest = &format[idx..];
                    if rest.starts_with("I64") {
                        directive.wide = true;
                    } else if !rest.starts_with("I32") {
                        break;
                    }
                    chars.next();
                    chars.next();
                    chars.next();
                }
                _ => break,
            }
        }

        let Some((end, conversion)) = chars.next() else {
            out.push_str(&format[start..]);
            break;
        };
        let directive_text = &format[start..end + conversion.len_utf8()];

        if conversion == '%' {
            out.push('%');
            continue;
        }
        if !matches!(conversion, 'd' | 'i' | 'u' | 'x' | 'X' | 'p' | 's' | 'c') {
            out.push_str(directive_text);
            continue;
        }
        let Some(value) = args.next() else {
            out.push_str(directive_text);
            continue;
        };

        let body = convert(conversion, value, &directive);
        pad(&mut out, &body, &directive);
    }
    out
}

fn convert(conversion: char, value: u64, directive: &Directive) -> String {
    let unsigned = if directive.wide || conversion == 'p' {
        value
    } else if directive.narrow {
        value as u16 as u64
    } else {
        value as u32 as u64
    };

    match conversion {
        'd' | 'i' => {
            let signed = if directive.wide {
                value as i64
            } else if directive.narrow {
                value as i16 as i64
            } else {
                value as i32 as i64
            };
            signed.to_string()
        }
        'u' => unsigned.to_string(),
        'x' if directive.alternate => format!("0x{:x}", unsigned),
        'x' => format!("{:x}", unsigned),
        'X' if directive.alternate => format!("0X{:X}", unsigned),
        'X' => format!("{:X}", unsigned),
        'p' => format!("{:016X}", unsigned),
        'c' => char::from_u32(unsigned as u32)
            .map(String::from)
            .unwrap_or_else(|| "?".to_string()),
        // string arguments are target pointers; only the address survives in the log
        _ => format!("<0x{:X}>", unsigned),
    }
}

fn pad(out: &mut String, body: &str, directive: &Directive) {
    let len = body.chars().count();
    if len >= directive.width {
        out.push_str(body);
        return;
    }
    let fill = directive.width - len;
    if directive.left_align {
        out.push_str(body);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if directive.zero_pad {
        let (sign, digits) = match body.strip_prefix('-') {
            Some(digits) => ("-", digits),
            None => ("", body),
        };
        out.push_str(sign);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(body);
    }
}
