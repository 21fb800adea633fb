//! Small delimited-text reader for the analytics dataset.

const CANDIDATE_DELIMITERS: [char; 4] = [',', '\t', '|', ';'];
const SNIFF_RECORDS: usize = 10;

/// Pick the delimiter that splits the first records into the same number of
/// fields, preferring the one producing the most fields. Falls back to `,`.
pub fn guess_delimiter(input: &str) -> char {
    let mut best = (',', 1usize);
    for delimiter in CANDIDATE_DELIMITERS {
        let counts: Vec<usize> = read_records(input, delimiter, SNIFF_RECORDS)
            .iter()
            .map(Vec::len)
            .collect();
        let Some(&first) = counts.first() else {
            continue;
        };
        if first > best.1 && counts.iter().all(|&count| count == first) {
            best = (delimiter, first);
        }
    }
    best.0
}

/// Read up to `limit` records. Double-quoted fields may contain the
/// delimiter and line breaks; `""` inside quotes is a literal quote.
/// `\r\n` ends a record like `\n`. Blank lines yield no record.
pub fn read_records(input: &str, delimiter: char, limit: usize) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while records.len() < limit {
        let Some(ch) = chars.next() else {
            break;
        };
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            c if in_quotes => field.push(c),
            c if c == delimiter => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            c => field.push(c),
        }
    }

    if records.len() < limit && (!record.is_empty() || !field.is_empty()) {
        record.push(field);
        push_record(&mut records, record);
    }
    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = matches!(record.as_slice(), [only] if only.trim().is_empty());
    if !blank {
        records.push(record);
    }
}

/// Header-keyed rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Header names are trimmed. Blank lines are skipped. Returns `None` when
    /// there is no header record at all.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let delimiter = guess_delimiter(input);
        let mut records = read_records(input, delimiter, usize::MAX).into_iter();

        let headers = records
            .next()?
            .into_iter()
            .map(|header| header.trim().to_string())
            .collect();
        Some(Self {
            headers,
            rows: records.collect(),
        })
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }
}
