/// Parse a 1-indexed page selection like "1,3-5" into sorted, deduplicated
/// 0-indexed page indices.
///
/// No upper bound is applied here; indices past the end of the document are
/// reported by the pipeline as per-page faults.
pub fn parse_page_range(input: &str) -> Result<Vec<usize>, String> {
    let mut pages: Vec<usize> = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_page_number(start)?;
                let end = parse_page_number(end)?;
                if start > end {
                    return Err(format!("descending range: '{part}'"));
                }
                pages.extend((start - 1)..end);
            }
            None => pages.push(parse_page_number(part)? - 1),
        }
    }

    if pages.is_empty() {
        return Err("empty page range".to_string());
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn parse_page_number(text: &str) -> Result<usize, String> {
    let page: usize = text
        .trim()
        .parse()
        .map_err(|_| format!("invalid page number: '{}'", text.trim()))?;
    if page == 0 {
        return Err("page numbers start at 1".to_string());
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page() {
        assert_eq!(parse_page_range("1").unwrap(), vec![0]);
        assert_eq!(parse_page_range("7").unwrap(), vec![6]);
    }

    #[test]
    fn range() {
        assert_eq!(parse_page_range("2-4").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn mixed_list_and_ranges() {
        assert_eq!(
            parse_page_range("1-3,7,10-11").unwrap(),
            vec![0, 1, 2, 6, 9, 10]
        );
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(parse_page_range("2,1-3,2").unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn whitespace_is_tolerated() {
        assert_eq!(parse_page_range(" 1 , 3 - 4 ").unwrap(), vec![0, 2, 3]);
    }

    #[test]
    fn page_zero_is_rejected() {
        assert!(parse_page_range("0").unwrap_err().contains("start at 1"));
        assert!(parse_page_range("0-2").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_page_range("abc").unwrap_err().contains("invalid"));
        assert!(parse_page_range("1,x").is_err());
    }

    #[test]
    fn descending_range_is_rejected() {
        assert!(parse_page_range("5-3").unwrap_err().contains("descending"));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(parse_page_range("").is_err());
        assert!(parse_page_range(" , ").is_err());
    }
}
