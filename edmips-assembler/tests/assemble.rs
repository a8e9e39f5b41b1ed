use edmips_assembler::{assemble, AsmError, AssemblerConfig, AssemblyImage};

fn asm(source: &str) -> AssemblyImage {
    assemble(source, &AssemblerConfig::default()).expect("source should assemble")
}

fn asm_err(source: &str) -> AsmError {
    assemble(source, &AssemblerConfig::default()).expect_err("source should be rejected")
}

/// Assemble a single instruction and return its encoded word.
fn word(instruction: &str) -> u32 {
    let image = asm(&format!(".text\n{}\n", instruction));
    assert_eq!(image.text_words.len(), 1);
    image.text_words[0]
}

#[test]
fn r_type_encodings() {
    assert_eq!(word("add $t0, $t1, $t2"), 0x012A_4020);
    assert_eq!(word("addu $t0, $t1, $t2"), 0x012A_4021);
    assert_eq!(word("sub $t0, $t1, $t2"), 0x012A_4022);
    assert_eq!(word("subu $t0, $t1, $t2"), 0x012A_4023);
    assert_eq!(word("and $t0, $t1, $t2"), 0x012A_4024);
    assert_eq!(word("or $t0, $t1, $t2"), 0x012A_4025);
    assert_eq!(word("xor $t0, $t1, $t2"), 0x012A_4026);
    assert_eq!(word("nor $t0, $t1, $t2"), 0x012A_4027);
    assert_eq!(word("slt $t0, $t1, $t2"), 0x012A_402A);
    assert_eq!(word("sltu $t0, $t1, $t2"), 0x012A_402B);
}

#[test]
fn shift_encodings() {
    assert_eq!(word("sll $t0, $t1, 4"), 0x0009_4100);
    assert_eq!(word("srl $t0, $t1, 4"), 0x0009_4102);
    assert_eq!(word("sra $t0, $t1, 4"), 0x0009_4103);
    assert_eq!(word("sllv $t0, $t1, $t2"), 0x0149_4004);
    assert_eq!(word("srlv $t0, $t1, $t2"), 0x0149_4006);
    assert_eq!(word("srav $t0, $t1, $t2"), 0x0149_4007);
}

#[test]
fn jump_register_and_traps() {
    assert_eq!(word("jr $ra"), 0x03E0_0008);
    assert_eq!(word("syscall"), 0x0000_000C);
    assert_eq!(word("break"), 0x0000_000D);
}

#[test]
fn pseudo_instructions() {
    // nop is the all-zero word (sll $0, $0, 0)
    assert_eq!(word("nop"), 0);
    // move expands to addu with $zero
    assert_eq!(word("move $t0, $t1"), 0x0120_4021);
}

#[test]
fn i_type_encodings() {
    assert_eq!(word("addi $t0, $t1, -1"), 0x2128_FFFF);
    assert_eq!(word("addiu $t0, $t1, -1"), 0x2528_FFFF);
    assert_eq!(word("slti $t0, $t1, -1"), 0x2928_FFFF);
    assert_eq!(word("sltiu $t0, $t1, -1"), 0x2D28_FFFF);
    assert_eq!(word("andi $t0, $t1, 0xFFFF"), 0x3128_FFFF);
    assert_eq!(word("ori $t0, $t1, 0xFFFF"), 0x3528_FFFF);
    assert_eq!(word("xori $t0, $t1, 0xFFFF"), 0x3928_FFFF);
    assert_eq!(word("lui $t0, 0x1234"), 0x3C08_1234);
}

#[test]
fn load_store_encodings() {
    assert_eq!(word("lb $t0, 4($t1)"), 0x8128_0004);
    assert_eq!(word("lh $t0, 4($t1)"), 0x8528_0004);
    assert_eq!(word("lw $t0, 4($t1)"), 0x8D28_0004);
    assert_eq!(word("lbu $t0, 4($t1)"), 0x9128_0004);
    assert_eq!(word("lhu $t0, 4($t1)"), 0x9528_0004);
    assert_eq!(word("sb $t0, 4($t1)"), 0xA128_0004);
    assert_eq!(word("sh $t0, 4($t1)"), 0xA528_0004);
    assert_eq!(word("sw $t0, 4($t1)"), 0xAD28_0004);
    assert_eq!(word("lw $t0, -4($sp)"), 0x8FA8_FFFC);
}

#[test]
fn numeric_registers_match_symbolic_names() {
    assert_eq!(word("add $8, $9, $10"), word("add $t0, $t1, $t2"));
    assert_eq!(word("add $T0, $T1, $T2"), word("add $t0, $t1, $t2"));
    assert_eq!(word("ADD $t0, $t1, $t2"), word("add $t0, $t1, $t2"));
}

#[test]
fn branch_encoding_is_relative_to_the_next_word() {
    let image = asm(
        ".text\n\
         loop: nop\n\
         beq $t0, $t1, loop\n\
         bne $t0, $t1, loop\n",
    );

    // beq at 0x00040004: offset = (0x40000 - 0x40008) >> 2 = -2
    assert_eq!(image.text_words[1], 0x1128_FFFE);
    assert_eq!(image.text_words[2], 0x1528_FFFD);
}

#[test]
fn jump_encoding_drops_region_and_alignment_bits() {
    let image = asm(
        ".text\n\
         j over\n\
         nop\n\
         over: syscall\n",
    );

    assert_eq!(
        image.text_words[0],
        (0x02 << 26) | ((0x0004_0008 >> 2) & 0x03FF_FFFF)
    );
}

#[test]
fn jal_encodes_like_j() {
    let image = asm(
        ".text\n\
         jal over\n\
         nop\n\
         over: syscall\n",
    );

    assert_eq!(
        image.text_words[0],
        (0x03 << 26) | ((0x0004_0008 >> 2) & 0x03FF_FFFF)
    );
}

#[test]
fn lui_with_label_takes_the_upper_half() {
    let image = asm(
        ".data\n\
         v: .word 0\n\
         .text\n\
         lui $t0, v\n",
    );

    // v = 0x10000000: bit 15 clear, no carry
    assert_eq!(image.text_words[0], 0x3C08_1000);
}

#[test]
fn lui_with_label_carries_when_bit_15_is_set() {
    let image = asm(
        ".data\n\
         .space 32768\n\
         v: .word 0\n\
         .text\n\
         lui $t0, v\n",
    );

    // v = 0x10008000: bit 15 set, upper half is incremented
    assert_eq!(image.text_words[0], 0x3C08_1001);
}

#[test]
fn word_directive_packs_big_endian() {
    let image = asm(".data\nx: .word 0x11223344\n");

    assert_eq!(image.data_bytes, vec![0x11, 0x22, 0x33, 0x44]);
    assert_eq!(image.symbols["x"], 0x1000_0000);
}

#[test]
fn word_directive_accepts_labels() {
    let image = asm(
        ".data\n\
         a: .word 1\n\
         b: .word a\n",
    );

    assert_eq!(
        image.data_bytes,
        vec![0x00, 0x00, 0x00, 0x01, 0x10, 0x00, 0x00, 0x00]
    );
}

#[test]
fn half_directive_aligns_to_two() {
    let image = asm(
        ".data\n\
         .byte 1\n\
         h: .half 0x1234\n",
    );

    assert_eq!(image.data_bytes, vec![1, 0, 0x12, 0x34]);
    assert_eq!(image.symbols["h"], 0x1000_0002);
}

#[test]
fn align_directive_reserves_the_padding() {
    let image = asm(
        ".data\n\
         .byte 1\n\
         .align 3\n\
         x: .word 5\n",
    );

    assert_eq!(image.symbols["x"], 0x1000_0008);
    assert_eq!(image.data_bytes.len(), 12);
    assert_eq!(&image.data_bytes[8..], &[0, 0, 0, 5]);
}

#[test]
fn ascii_and_asciiz() {
    let image = asm(
        ".data\n\
         s: .ascii \"AB\"\n\
         z: .asciiz \"C\"\n",
    );

    assert_eq!(image.data_bytes, vec![0x41, 0x42, 0x43, 0x00]);
    assert_eq!(image.symbols["z"], 0x1000_0002);
}

#[test]
fn string_escapes() {
    let image = asm(".data\n.asciiz \"a\\n\\t\\0\"\n");

    assert_eq!(image.data_bytes, vec![0x61, 0x0A, 0x09, 0x00, 0x00]);
}

#[test]
fn char_literals_in_byte_directive() {
    let image = asm(".data\n.byte 'A', '\\n'\n");

    assert_eq!(image.data_bytes, vec![65, 10]);
}

#[test]
fn space_reserves_zeroed_bytes() {
    let image = asm(
        ".data\n\
         .space 3\n\
         x: .byte 7\n",
    );

    assert_eq!(image.symbols["x"], 0x1000_0003);
    assert_eq!(image.data_bytes, vec![0, 0, 0, 7]);
}

#[test]
fn source_map_covers_only_emitting_lines() {
    let image = asm(
        "# header comment\n\
         .text\n\
         start:\n\
         nop\n\
         nop\n",
    );

    let entries: Vec<(u32, usize)> = image.source_map.iter().map(|(&a, &l)| (a, l)).collect();
    assert_eq!(entries, vec![(0x0004_0000, 4), (0x0004_0004, 5)]);
}

#[test]
fn labels_are_case_insensitive() {
    let image = asm(
        ".text\n\
         Loop: j LOOP\n",
    );

    assert_eq!(image.symbols["loop"], 0x0004_0000);
}

#[test]
fn custom_segment_bases() {
    let config = AssemblerConfig {
        text_start_addr: 0x0040_0000,
        data_start_addr: 0x1001_0000,
    };
    let image = assemble(
        ".data\nx: .word 1\n.text\nentry: j entry\n",
        &config,
    )
    .unwrap();

    assert_eq!(image.text_start, 0x0040_0000);
    assert_eq!(image.data_start, 0x1001_0000);
    assert_eq!(image.symbols["x"], 0x1001_0000);
    assert_eq!(
        image.text_words[0],
        (0x02 << 26) | ((0x0040_0000 >> 2) & 0x03FF_FFFF)
    );
}

#[test]
fn unknown_directives_are_ignored_with_a_warning() {
    let image = asm(
        ".text\n\
         .globl main\n\
         main: nop\n",
    );

    assert_eq!(image.text_words, vec![0]);
    assert_eq!(image.symbols["main"], 0x0004_0000);
}

#[test]
fn branch_offset_range_limits() {
    // Forward: the farthest reachable target is 32767 words past pc+4
    let mut source = String::from(".text\nbeq $t0, $t1, far\n");
    for _ in 0..32_767 {
        source.push_str("nop\n");
    }
    source.push_str("far: nop\n");
    assert!(assemble(&source, &AssemblerConfig::default()).is_ok());

    let mut source = String::from(".text\nbeq $t0, $t1, far\n");
    for _ in 0..32_768 {
        source.push_str("nop\n");
    }
    source.push_str("far: nop\n");
    assert!(matches!(
        assemble(&source, &AssemblerConfig::default()),
        Err(AsmError::BranchOutOfRange { .. })
    ));
}

#[test]
fn backward_branch_offset_range_limits() {
    // Backward: the earliest reachable target is 32768 words behind pc+4
    let mut source = String::from(".text\nback: nop\n");
    for _ in 0..32_766 {
        source.push_str("nop\n");
    }
    source.push_str("beq $t0, $t1, back\n");
    assert!(assemble(&source, &AssemblerConfig::default()).is_ok());

    let mut source = String::from(".text\nback: nop\n");
    for _ in 0..32_767 {
        source.push_str("nop\n");
    }
    source.push_str("beq $t0, $t1, back\n");
    assert!(matches!(
        assemble(&source, &AssemblerConfig::default()),
        Err(AsmError::BranchOutOfRange { .. })
    ));
}

#[test]
fn li_and_la_are_rejected() {
    assert!(matches!(
        asm_err(".text\nli $t0, 5\n"),
        AsmError::UnsupportedPseudo { line: 2, .. }
    ));
    assert!(matches!(
        asm_err(".text\nla $t0, somewhere\n"),
        AsmError::UnsupportedPseudo { line: 2, .. }
    ));
}

#[test]
fn duplicate_labels_are_rejected_case_insensitively() {
    let err = asm_err(
        ".text\n\
         Loop: nop\n\
         loop: nop\n",
    );

    assert_eq!(
        err,
        AsmError::DuplicateLabel {
            line: 3,
            label: "loop".to_string()
        }
    );
}

#[test]
fn instructions_outside_text_are_rejected() {
    assert_eq!(
        asm_err(".data\nnop\n"),
        AsmError::InstructionOutsideText { line: 2 }
    );
}

#[test]
fn undefined_symbols_are_reported_in_pass_two() {
    assert!(matches!(
        asm_err(".text\nj nowhere\n"),
        AsmError::UndefinedSymbol { line: 2, .. }
    ));
    assert!(matches!(
        asm_err(".text\nbeq $t0, $t1, nowhere\n"),
        AsmError::UndefinedSymbol { line: 2, .. }
    ));
    assert!(matches!(
        asm_err(".data\n.word missing\n"),
        AsmError::UndefinedSymbol { line: 2, .. }
    ));
}

#[test]
fn unaligned_jump_targets_are_rejected() {
    let err = asm_err(
        ".data\n\
         .byte 1\n\
         x: .byte 2\n\
         .text\n\
         j x\n",
    );

    assert!(matches!(
        err,
        AsmError::UnalignedJumpTarget {
            line: 5,
            address: 0x1000_0001,
            ..
        }
    ));
}

#[test]
fn operand_mistakes_are_rejected() {
    assert!(matches!(
        asm_err(".text\nadd $t0, $t1\n"),
        AsmError::BadOperands { line: 2, .. }
    ));
    assert!(matches!(
        asm_err(".text\nadd $t0, $t1, 5\n"),
        AsmError::BadOperands { line: 2, .. }
    ));
    assert_eq!(
        asm_err(".text\nnop nop\n"),
        AsmError::TrailingTokens { line: 2 }
    );
    assert!(matches!(
        asm_err(".text\nadd $t0, $t1, $q7\n"),
        AsmError::InvalidRegister { line: 2, .. }
    ));
    assert!(matches!(
        asm_err(".text\nadd $32, $t1, $t2\n"),
        AsmError::InvalidRegister { line: 2, .. }
    ));
    assert!(matches!(
        asm_err(".text\nwhatever $t0\n"),
        AsmError::UnknownInstruction { line: 2, .. }
    ));
}

#[test]
fn out_of_range_values_are_rejected() {
    assert!(matches!(
        asm_err(".text\nsll $t0, $t1, 32\n"),
        AsmError::ShiftOutOfRange { line: 2, value: 32 }
    ));
    assert!(matches!(
        asm_err(".text\naddi $t0, $t1, 40000\n"),
        AsmError::ImmediateOutOfRange { line: 2, .. }
    ));
    assert!(matches!(
        asm_err(".text\nori $t0, $t1, -1\n"),
        AsmError::ImmediateOutOfRange { line: 2, .. }
    ));
    assert!(matches!(
        asm_err(".text\nandi $t0, $t1, 70000\n"),
        AsmError::ImmediateOutOfRange { line: 2, .. }
    ));
    assert!(matches!(
        asm_err(".text\nlw $t0, 70000($t1)\n"),
        AsmError::ImmediateOutOfRange { line: 2, .. }
    ));
}

#[test]
fn syntax_and_trailing_tokens() {
    assert!(matches!(asm_err(".text\nadd $t0, @\n"), AsmError::Syntax { line: 2, .. }));
    assert_eq!(asm_err(".text 5\n"), AsmError::TrailingTokens { line: 1 });
    assert_eq!(
        asm_err(".data\n.space 4 4\n"),
        AsmError::TrailingTokens { line: 2 }
    );
}

#[test]
fn errors_report_their_line() {
    assert_eq!(asm_err(".text\n\nli $t0, 1\n").line(), 3);
}

#[test]
fn text_size_is_a_multiple_of_four() {
    let image = asm(".text\nnop\nnop\nnop\n");

    assert_eq!(image.text_size(), 12);
    assert_eq!(image.text_size() % 4, 0);
    assert_eq!(image.data_size(), 0);
}
