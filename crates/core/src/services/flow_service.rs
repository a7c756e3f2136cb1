use crate::models::chain::{Chain, ALL_KEY, NETWORK_COLOR, NETWORK_NAME};
use crate::models::chart::{ChordMatrix, CirclePackingNode};
use crate::models::stats::{BidirectionalTransferData, DirectionalTransferData};

/// Build the chain-to-chain flow matrix of one period.
///
/// The matrix is indexed by chain id minus one. Only pairs of known,
/// non-excluded chains with a positive all-assets (`"*"`) value are set;
/// everything else stays `None` so the renderer draws no ribbon at all.
pub fn chord_matrix(within_period: &BidirectionalTransferData) -> ChordMatrix {
    let size = Chain::ALL.len();
    let mut matrix = ChordMatrix::empty(size);
    matrix.keys = Chain::names();

    for (source_key, dests) in within_period {
        let Some(source) = Chain::from_key(source_key) else {
            continue;
        };
        let source_index = usize::from(source.id()) - 1;

        for (dest_key, symbols) in dests {
            let Some(dest) = Chain::from_key(dest_key) else {
                continue;
            };
            let dest_index = usize::from(dest.id()) - 1;

            match symbols.get(ALL_KEY) {
                Some(&value) if value > 0.0 => {
                    matrix.cells[dest_index][source_index] = Some(value);
                }
                _ => {}
            }
        }
    }

    matrix
}

/// Build the network → chain → asset tree for circle packing.
///
/// The `"*"` chain aggregate is stripped first; it would otherwise sit next
/// to the real chains and double every total. Per-chain `"*"` asset totals
/// are skipped for the same reason.
pub fn circle_packing_tree(all_time: &DirectionalTransferData) -> CirclePackingNode {
    let mut root = CirclePackingNode {
        id: NETWORK_NAME.to_string(),
        name: NETWORK_NAME.to_string(),
        color: NETWORK_COLOR.to_string(),
        amount: None,
        children: Vec::new(),
    };

    let mut chains: Vec<(Chain, _)> = all_time
        .iter()
        .filter(|(key, _)| key.as_str() != ALL_KEY)
        .filter_map(|(key, symbols)| Chain::from_key(key).map(|chain| (chain, symbols)))
        .collect();
    chains.sort_by_key(|(chain, _)| *chain);

    for (chain, symbols) in chains {
        let children = symbols
            .iter()
            .filter(|(symbol, _)| symbol.as_str() != ALL_KEY)
            .map(|(symbol, amount)| CirclePackingNode {
                id: format!("{symbol}-{}", chain.id()),
                name: symbol.clone(),
                color: string_to_colour(symbol),
                amount: Some(*amount),
                children: Vec::new(),
            })
            .collect();

        root.children.push(CirclePackingNode {
            id: chain.name().to_string(),
            name: chain.name().to_string(),
            color: chain
                .reserved_color()
                .map(str::to_string)
                .unwrap_or_else(|| string_to_colour(chain.name())),
            amount: None,
            children,
        });
    }

    root
}

/// Deterministic `#rrggbb` color derived from a name.
///
/// The hash runs over UTF-16 code units with 32-bit wrapping arithmetic
/// (`hash = unit + (hash << 5) - hash`), and the color bytes are the low
/// three bytes of the hash, least significant first.
pub fn string_to_colour(name: &str) -> String {
    let mut hash: i32 = 0;
    for unit in name.encode_utf16() {
        hash = i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    let mut colour = String::from("#");
    for i in 0..3 {
        let value = (hash >> (i * 8)) & 0xFF;
        colour.push_str(&format!("{value:02x}"));
    }
    colour
}
