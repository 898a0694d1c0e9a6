pub mod chess_com;
