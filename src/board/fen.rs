//! FEN parsing/emission, covering both standard castling notation (`KQkq`)
//! and Shredder/Fischer-Random notation (rook home-file letters). Castling
//! rook squares are read off the board itself rather than assumed to be
//! the a/h files.

use crate::error::{EngineError, EngineResult};
use crate::types::{Color, Move, Piece, PieceType, Square};

use super::castling::{bit_for, CastleRightsSide};
use super::Board;

impl Board {
    /// Parse a FEN string, accepting either standard `KQkq` castling
    /// notation or Shredder-FEN rook-file letters.
    pub fn try_from_fen(fen: &str) -> EngineResult<Self> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(EngineError::Fen(format!(
                "expected at least 4 fields, found {}",
                parts.len()
            )));
        }

        for (rank_idx, rank_str) in parts[0].split('/').enumerate() {
            if rank_idx >= 8 {
                return Err(EngineError::Fen(format!("too many ranks: {fen}")));
            }
            let rank = 7 - rank_idx;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let color = if c.is_uppercase() { Color::White } else { Color::Black };
                    let kind = PieceType::from_char(c)
                        .ok_or_else(|| EngineError::Fen(format!("bad piece char '{c}'")))?;
                    if file >= 8 {
                        return Err(EngineError::Fen(format!("rank {rank_idx} overflows files")));
                    }
                    board.set_piece(Square::new(rank, file), Piece::new(color, kind));
                    file += 1;
                }
            }
        }

        board.white_to_move = match parts[1] {
            "w" => true,
            "b" => false,
            other => return Err(EngineError::Fen(format!("bad side to move '{other}'"))),
        };

        board.parse_castling_field(parts[2])?;

        board.en_passant_target = if parts[3] == "-" {
            crate::types::NULL_SQUARE
        } else {
            parts[3]
                .parse()
                .map_err(|()| EngineError::Fen(format!("bad en-passant square '{}'", parts[3])))?
        };

        if parts.len() >= 5 {
            board.halfmove_clock = parts[4].parse().unwrap_or(0);
        }
        if parts.len() >= 6 {
            board.fullmove_number = parts[5].parse().unwrap_or(1);
        }

        board.finish_setup();
        Ok(board)
    }

    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("invalid FEN")
    }

    fn parse_castling_field(&mut self, field: &str) -> EngineResult<()> {
        // Standard chess only needs the king's own square to know the rook
        // files are 0 and 7; Fischer-Random positions need the king square
        // to disambiguate a rook-file letter into kingside/queenside.
        let white_king = self.king_home_file(Color::White);
        let black_king = self.king_home_file(Color::Black);

        for c in field.chars() {
            match c {
                '-' => {}
                'K' => self.grant_standard_right(Color::White, CastleRightsSide::King, 7),
                'Q' => self.grant_standard_right(Color::White, CastleRightsSide::Queen, 0),
                'k' => self.grant_standard_right(Color::Black, CastleRightsSide::King, 7),
                'q' => self.grant_standard_right(Color::Black, CastleRightsSide::Queen, 0),
                'A'..='H' => {
                    let file = (c as u8 - b'A') as usize;
                    self.grant_shredder_right(Color::White, white_king, file)?;
                }
                'a'..='h' => {
                    let file = (c as u8 - b'a') as usize;
                    self.grant_shredder_right(Color::Black, black_king, file)?;
                }
                _ => return Err(EngineError::Fen(format!("bad castling char '{c}'"))),
            }
        }
        Ok(())
    }

    fn king_home_file(&self, color: Color) -> usize {
        let king_bb = self.pieces[color.index()][PieceType::King.index()];
        if king_bb.is_empty() {
            4
        } else {
            king_bb.lsb().file()
        }
    }

    fn grant_standard_right(&mut self, color: Color, side: CastleRightsSide, file: usize) {
        self.castling_rights |= bit_for(color, side);
        let slot = if side == CastleRightsSide::King { 0 } else { 1 };
        self.castle_rook_file[color.index()][slot] = file as u8;
    }

    fn grant_shredder_right(
        &mut self,
        color: Color,
        king_file: usize,
        rook_file: usize,
    ) -> EngineResult<()> {
        let side = if rook_file > king_file {
            CastleRightsSide::King
        } else {
            CastleRightsSide::Queen
        };
        self.grant_standard_right(color, side, rook_file);
        Ok(())
    }

    /// Emit FEN using standard `KQkq` notation unless the position actually
    /// requires Shredder-FEN rook-file letters (rook not on the a/h file).
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empties = 0;
            for file in 0..8 {
                let piece = self.piece_at(Square::new(rank, file));
                if piece.is_null() {
                    empties += 1;
                } else {
                    if empties > 0 {
                        row.push_str(&empties.to_string());
                        empties = 0;
                    }
                    row.push(piece.to_fen_char());
                }
            }
            if empties > 0 {
                row.push_str(&empties.to_string());
            }
            rows.push(row);
        }

        let side = if self.white_to_move { "w" } else { "b" };
        let castling = self.castling_field();
        let ep = self
            .en_passant_square()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            side,
            castling,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    fn castling_field(&self) -> String {
        let chess960 = self.castle_rook_file[0] != [0, 7] || self.castle_rook_file[1] != [0, 7];
        let mut out = String::new();
        for (color, upper) in [(Color::White, true), (Color::Black, false)] {
            for (side, slot) in [(CastleRightsSide::King, 0usize), (CastleRightsSide::Queen, 1)] {
                if self.has_castling_right(color, side) {
                    let c = if chess960 {
                        (b'A' + self.castle_rook_file[color.index()][slot]) as char
                    } else if side == CastleRightsSide::King {
                        'K'
                    } else {
                        'Q'
                    };
                    out.push(if upper { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() });
                }
            }
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }

    /// Parse long-algebraic UCI notation (`e2e4`, `e7e8q`) against the
    /// current legal move list. FRC castling arrives as `e1h1` (king
    /// captures its own rook); both that and the standard `e1g1` form
    /// resolve to the same castling move.
    pub fn parse_uci_move(&mut self, uci: &str) -> EngineResult<Move> {
        if uci.len() < 4 || uci.len() > 5 {
            return Err(EngineError::UciMove(uci.to_string()));
        }
        let from: Square = uci[0..2]
            .parse()
            .map_err(|()| EngineError::UciMove(uci.to_string()))?;
        let to: Square = uci[2..4]
            .parse()
            .map_err(|()| EngineError::UciMove(uci.to_string()))?;
        let promotion = if uci.len() == 5 {
            Some(
                PieceType::from_char(uci.as_bytes()[4] as char)
                    .ok_or_else(|| EngineError::UciMove(uci.to_string()))?,
            )
        } else {
            None
        };

        for m in self.generate_legal_moves().as_slice() {
            if m.source() != from {
                continue;
            }
            let destination_matches = m.destination() == to
                || (m.move_type() == crate::types::MoveType::Castles
                    && to == Square::new(from.rank(), self.castle_rook_file_of(*m)));
            if !destination_matches {
                continue;
            }
            let promo_matches = match promotion {
                Some(p) => m.promotion_piece() == p,
                None => m.promotion_piece().is_none(),
            };
            if promo_matches {
                return Ok(*m);
            }
        }
        Err(EngineError::UciMove(uci.to_string()))
    }

    fn castle_rook_file_of(&self, m: Move) -> usize {
        m.castle_rook_file() as usize
    }
}
