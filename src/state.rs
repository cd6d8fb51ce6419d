//! Fixed-layout binary save format.
//!
//! One contiguous record: a magic/version/CRC32 header followed by the
//! payload in a fixed field order — 64 board square codes row-major, the two
//! player names (u32 LE length + UTF-8 bytes each), the two capture
//! counters, the turn flag, and the winner indicator. Save and load are
//! blocking whole-file operations; a failed load leaves the caller's game
//! untouched.

use std::fs;
use std::path::Path;

use log::{debug, error};

use crate::game::Game;
use crate::types::{GameSnapshot, Player, Square};

const MAGIC: &[u8; 4] = b"DAMA";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 12;
const BOARD_CELLS: usize = 64;

/// Serializes a snapshot into one save record.
pub fn encode(snapshot: &GameSnapshot) -> Vec<u8> {
    let mut payload = Vec::with_capacity(BOARD_CELLS + 64);

    for rank in &snapshot.board {
        for square in rank {
            payload.push(square.code());
        }
    }
    write_string(&mut payload, &snapshot.player_one_name);
    write_string(&mut payload, &snapshot.player_two_name);
    payload.push(snapshot.p1_captures);
    payload.push(snapshot.p2_captures);
    payload.push(snapshot.player_one_to_move as u8);
    payload.push(match snapshot.winner {
        None => 0,
        Some(Player::One) => 1,
        Some(Player::Two) => 2,
    });

    let crc = crc32fast::hash(&payload);
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&payload);
    out
}

/// Deserializes a save record produced by [`encode`].
pub fn decode(data: &[u8]) -> Result<GameSnapshot, String> {
    if data.len() < HEADER_SIZE {
        return Err(format!(
            "save data too short: expected at least {HEADER_SIZE} bytes, got {}",
            data.len()
        ));
    }

    if &data[0..4] != MAGIC {
        return Err("invalid save file magic (expected DAMA)".to_string());
    }

    let version = read_u32_le(data, 4)?;
    if version != VERSION {
        return Err(format!(
            "unsupported save version: expected {VERSION}, got {version}"
        ));
    }

    let expected_crc = read_u32_le(data, 8)?;
    let payload = &data[HEADER_SIZE..];
    let actual_crc = crc32fast::hash(payload);
    if actual_crc != expected_crc {
        return Err(format!(
            "CRC32 mismatch: expected {expected_crc:#010x}, got {actual_crc:#010x}"
        ));
    }

    if payload.len() < BOARD_CELLS {
        return Err("unexpected EOF while reading the board grid".to_string());
    }
    let mut board = [[Square::Empty; 8]; 8];
    for (idx, code) in payload[..BOARD_CELLS].iter().enumerate() {
        board[idx / 8][idx % 8] = Square::from_code(*code)
            .ok_or_else(|| format!("invalid square code {code} at cell {idx}"))?;
    }

    let mut offset = BOARD_CELLS;
    let player_one_name = read_string(payload, &mut offset, "player one name")?;
    let player_two_name = read_string(payload, &mut offset, "player two name")?;

    let tail = payload
        .get(offset..offset + 4)
        .ok_or_else(|| "unexpected EOF while reading scores and flags".to_string())?;
    let winner = match tail[3] {
        0 => None,
        1 => Some(Player::One),
        2 => Some(Player::Two),
        other => return Err(format!("invalid winner indicator {other}")),
    };
    if payload.len() != offset + 4 {
        return Err(format!(
            "unexpected {} trailing bytes after the save record",
            payload.len() - offset - 4
        ));
    }

    Ok(GameSnapshot {
        board,
        player_one_name,
        player_two_name,
        p1_captures: tail[0],
        p2_captures: tail[1],
        player_one_to_move: tail[2] != 0,
        winner,
    })
}

/// Writes the whole game state to `path` in one blocking call.
pub fn save(game: &Game, path: impl AsRef<Path>) -> Result<(), String> {
    let path = path.as_ref();
    let bytes = encode(&game.snapshot());
    fs::write(path, &bytes).map_err(|e| {
        error!("failed to save game to {}: {e}", path.display());
        format!("unable to write save file: {e}")
    })?;

    debug!("saved game ({} bytes) to {}", bytes.len(), path.display());
    Ok(())
}

/// Reads a whole game state back from `path` in one blocking call.
pub fn load(path: impl AsRef<Path>) -> Result<Game, String> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| {
        error!("failed to load game from {}: {e}", path.display());
        format!("unable to read save file: {e}")
    })?;
    let snapshot = decode(&data).map_err(|e| {
        error!("failed to decode save file {}: {e}", path.display());
        e
    })?;

    debug!("loaded game ({} bytes) from {}", data.len(), path.display());
    Ok(Game::from_snapshot(&snapshot))
}

fn write_string(payload: &mut Vec<u8>, value: &str) {
    payload.extend_from_slice(&(value.len() as u32).to_le_bytes());
    payload.extend_from_slice(value.as_bytes());
}

fn read_string(payload: &[u8], offset: &mut usize, field: &str) -> Result<String, String> {
    let len = read_u32_le(payload, *offset)? as usize;
    *offset += 4;

    let bytes = payload
        .get(*offset..*offset + len)
        .ok_or_else(|| format!("unexpected EOF while reading {field}"))?;
    *offset += len;

    String::from_utf8(bytes.to_vec()).map_err(|_| format!("{field} is not valid UTF-8"))
}

fn read_u32_le(data: &[u8], offset: usize) -> Result<u32, String> {
    if offset + 4 > data.len() {
        return Err("unexpected EOF while reading u32".to_string());
    }
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    Ok(u32::from_le_bytes(bytes))
}
