/// Feed author: the configured one, else the real name of the OS user,
/// else the login name.
pub fn feed_author(configured: Option<&str>) -> String {
    if let Some(author) = configured.map(str::trim).filter(|a| !a.is_empty()) {
        return author.to_string();
    }

    let real_name = whoami::realname();
    match real_name.trim() {
        "" => whoami::username(),
        name => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_author_wins() {
        assert_eq!(feed_author(Some(" Jane Doe ")), "Jane Doe");
    }
}
