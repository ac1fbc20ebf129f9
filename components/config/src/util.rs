use std::net::SocketAddr;
use std::str::FromStr;

pub fn parse<T: FromStr>(s: &str, default: T) -> T {
    s.parse().unwrap_or(default)
}

pub fn parse_address(value: &str) -> SocketAddr {
    let value = value.replace("localhost", "127.0.0.1");

    match SocketAddr::from_str(&value) {
        Ok(addr) => addr,
        Err(e) => {
            tracing::warn!("Invalid socket address {value:?}: {e}, falling back to 127.0.0.1:7070");
            SocketAddr::from(([127, 0, 0, 1], 7070))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("localhost:9000"), SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(parse_address("nonsense").port(), 7070);
    }

    #[test]
    fn test_parse_default() {
        assert_eq!(parse("12", 0u32), 12);
        assert_eq!(parse("twelve", 3u32), 3);
    }
}
