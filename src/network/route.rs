use tracing::debug;

use super::Route;

/// Kernel IPv4 routing table.
pub const DEFAULT_ROUTE_TABLE: &str = "/proc/net/route";

const RTF_UP: u32 = 0x0001;

/// Parse the text of `/proc/net/route`.
///
/// Columns: Iface Destination Gateway Flags RefCnt Use Metric Mask MTU Window IRTT, with
/// hexadecimal destination/flags/mask. A route that is up with destination and mask both zero
/// is a default route. Rows that do not parse are skipped.
pub fn parse_route_table(content: &str) -> Vec<Route> {
    let mut routes = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.is_empty() || cols[0] == "Iface" {
            continue;
        }
        if cols.len() < 8 {
            debug!("route table line {lineno}: expected at least 8 columns, skipping");
            continue;
        }
        let (Some(dest), Some(flags), Some(mask)) =
            (hex_u32(cols[1]), hex_u32(cols[3]), hex_u32(cols[7]))
        else {
            debug!("route table line {lineno}: malformed hex field, skipping");
            continue;
        };
        let iface = match cols[0] {
            "*" => None,
            name => Some(name.to_string()),
        };
        routes.push(Route {
            iface,
            is_default: dest == 0 && mask == 0 && flags & RTF_UP != 0,
        });
    }
    routes
}

fn hex_u32(s: &str) -> Option<u32> {
    u32::from_str_radix(s, 16).ok()
}
